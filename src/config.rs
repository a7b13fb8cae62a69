//! Configuration module for the echo server.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values.

use clap::Parser;
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

/// Listen address used when neither the CLI nor the config file names one
const DEFAULT_LISTEN: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 50007));

/// Command-line arguments for the echo server
#[derive(Parser, Debug)]
#[command(name = "echo-server")]
#[command(version = "0.1.0")]
#[command(about = "A blocking TCP echo server, one connection at a time", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to (e.g., 0.0.0.0:50007)
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Size of the per-read buffer in bytes
    #[arg(short = 'b', long)]
    pub buffer_size: Option<usize>,

    /// Listen backlog passed to listen(2)
    #[arg(long)]
    pub backlog: Option<i32>,

    /// Do not set SO_REUSEADDR on the listening socket
    #[arg(long)]
    pub no_reuse_address: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub echo: EchoConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Pending connection queue length
    #[serde(default = "default_backlog")]
    pub backlog: i32,
    /// Whether to set SO_REUSEADDR before binding
    #[serde(default = "default_reuse_address")]
    pub reuse_address: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            backlog: default_backlog(),
            reuse_address: default_reuse_address(),
        }
    }
}

/// Echo loop configuration
#[derive(Debug, Deserialize)]
pub struct EchoConfig {
    /// Maximum bytes taken from the socket per read
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_backlog() -> i32 {
    1
}

fn default_reuse_address() -> bool {
    true
}

fn default_buffer_size() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub buffer_size: usize,
    pub backlog: i32,
    pub reuse_address: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN,
            buffer_size: default_buffer_size(),
            backlog: default_backlog(),
            reuse_address: default_reuse_address(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from process arguments and optional TOML file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(CliArgs::parse())
    }

    /// Merge already-parsed CLI arguments over the TOML file they name.
    /// CLI arguments take precedence over TOML file values.
    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        let listen = cli.listen.unwrap_or(toml_config.server.listen);
        let listen: SocketAddr = listen
            .parse()
            .map_err(|e| ConfigError::InvalidListen(listen.clone(), e))?;

        let buffer_size = cli.buffer_size.unwrap_or(toml_config.echo.buffer_size);
        if buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }

        let backlog = cli.backlog.unwrap_or(toml_config.server.backlog);
        if backlog < 0 {
            return Err(ConfigError::InvalidBacklog(backlog));
        }

        Ok(Config {
            listen,
            buffer_size,
            backlog,
            reuse_address: !cli.no_reuse_address && toml_config.server.reuse_address,
            log_level: cli.log_level.unwrap_or(toml_config.logging.level),
        })
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
    InvalidListen(String, std::net::AddrParseError),
    InvalidBufferSize,
    InvalidBacklog(i32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidListen(addr, e) => {
                write!(f, "Invalid listen address '{}': {}", addr, e)
            }
            ConfigError::InvalidBufferSize => {
                write!(f, "Buffer size must be greater than zero")
            }
            ConfigError::InvalidBacklog(backlog) => {
                write!(f, "Listen backlog must not be negative, got {}", backlog)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
