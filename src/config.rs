//! Configuration module
//!
//! Immutable server configuration, fixed once the process starts. Values
//! come from an optional `devserve.toml`, `DEVSERVE_*` environment
//! overrides, and code defaults, layered through the `config` crate.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ServerError;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub root: RootConfig,
    pub browser: BrowserConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// The directory tree exposed for serving
#[derive(Debug, Deserialize, Clone)]
pub struct RootConfig {
    pub dir: String,
    /// File served when a request resolves to a directory
    pub index_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Open the default browser once the server is listening
    pub open: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration from the default `devserve.toml` location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("devserve")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DEVSERVE"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("root.dir", ".")?
            .set_default("root.index_file", "index.html")?
            .set_default("browser.open", true)?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| ServerError::Addr { addr, source })
    }

    /// The URL printed in the banner and handed to the browser hook
    pub fn url(&self) -> String {
        format!("http://localhost:{}/", self.server.port)
    }

    /// Resolve the root directory to its canonical form and verify it is a
    /// readable directory. The canonical path is the anchor for the
    /// traversal guard, so it is computed exactly once.
    pub fn canonical_root(&self) -> Result<PathBuf, ServerError> {
        let path = Path::new(&self.root.dir);
        let canonical = path.canonicalize().map_err(|source| ServerError::RootDir {
            path: path.to_path_buf(),
            source,
        })?;
        if canonical.is_dir() {
            Ok(canonical)
        } else {
            Err(ServerError::RootDir {
                path: canonical,
                source: std::io::Error::other("not a directory"),
            })
        }
    }
}

/// Read-only state shared by every request handler
pub struct ServerState {
    pub config: Config,
    /// Canonicalized root directory, validated at startup
    pub root: PathBuf,
}

impl ServerState {
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let root = config.canonical_root()?;
        Ok(Self { config, root })
    }
}
