//! Blocking TCP echo server.
//!
//! Connections are served strictly one at a time: the next `accept` happens
//! only after the current peer has closed and its socket has been dropped.

use crate::config::Config;
use crate::echo::{self, ConnectionStats};
use crate::listener;
use std::io;
use std::net::{SocketAddr, TcpListener};
use tracing::{debug, error, info};

/// Server instance
pub struct Server {
    listener: TcpListener,
    buffer: Vec<u8>,
}

impl Server {
    /// Bind the listening socket described by `config`.
    pub fn bind(config: &Config) -> io::Result<Self> {
        let server = Server {
            listener: listener::bind(config)?,
            buffer: vec![0; config.buffer_size],
        };
        info!(address = %server.local_addr()?, "Listening");

        Ok(server)
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever. Returns only when an I/O error occurs.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if let Err(e) = self.serve_one() {
                error!(error = %e, "Echo loop terminated");
                return Err(e);
            }
        }
    }

    /// Accept a single connection and echo until the peer closes it.
    pub fn serve_one(&mut self) -> io::Result<ConnectionStats> {
        let (mut stream, peer) = self.listener.accept()?;
        info!(peer = %peer, "Connected");

        let stats = echo::echo(&mut stream, &mut self.buffer)?;
        drop(stream);

        debug!(peer = %peer, reads = stats.reads, bytes = stats.bytes, "Connection closed");
        Ok(stats)
    }
}
