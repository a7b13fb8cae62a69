//! echo-server: a blocking TCP echo server
//!
//! Accepts one connection at a time and writes every byte it reads back to
//! the sender until the peer closes, then accepts the next connection.
//!
//! Features:
//! - Raw byte echo with a fixed-size read buffer
//! - SO_REUSEADDR listener for quick restarts
//! - Configuration via CLI arguments or TOML file

mod config;
mod echo;
mod listener;
mod server;

use config::Config;
use server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        listen = %config.listen,
        buffer_size = config.buffer_size,
        backlog = config.backlog,
        reuse_address = config.reuse_address,
        "Starting echo server"
    );

    let mut server = Server::bind(&config)?;
    server.run()?;
    Ok(())
}
