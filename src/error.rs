//! Error types for the development server.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup errors. Anything here exits the process with a non-zero
/// status; per-request problems (missing files, blocked paths) are reported
/// to the client instead and never surface as this type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound (port taken, no permission).
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    /// The configured host/port pair is not a valid socket address.
    #[error("invalid server address '{addr}': {source}")]
    Addr {
        addr: String,
        source: std::net::AddrParseError,
    },

    /// The configured root directory is missing or unreadable.
    #[error("root directory '{path}' is not a readable directory: {source}")]
    RootDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file or environment override could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
