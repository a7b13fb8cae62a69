//! Listening socket construction.

use crate::config::Config;
use std::io;
use std::net::{SocketAddr, TcpListener};

/// Create a blocking TCP listener for the configured address.
///
/// `SO_REUSEADDR` lets a restarted server rebind while connections from the
/// previous run are still in TIME_WAIT.
pub fn bind(config: &Config) -> io::Result<TcpListener> {
    let addr = config.listen;
    let socket = socket2::Socket::new(
        match addr {
            SocketAddr::V4(_) => socket2::Domain::IPV4,
            SocketAddr::V6(_) => socket2::Domain::IPV6,
        },
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(config.reuse_address)?;
    socket.set_nonblocking(false)?;
    socket.bind(&addr.into())?;
    socket.listen(config.backlog)?;

    Ok(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_config() -> Config {
        Config {
            listen: "127.0.0.1:0".parse().unwrap(),
            ..Config::default()
        }
    }

    #[test]
    fn test_bind_ephemeral_port() {
        let listener = bind(&loopback_config()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn test_reuse_address_applied() {
        let listener = bind(&loopback_config()).unwrap();
        let socket = socket2::SockRef::from(&listener);
        assert!(socket.reuse_address().unwrap());
    }

    #[test]
    fn test_bind_conflict_without_reuse() {
        let first = bind(&loopback_config()).unwrap();
        let config = Config {
            listen: first.local_addr().unwrap(),
            reuse_address: false,
            ..Config::default()
        };
        assert!(bind(&config).is_err());
    }
}
