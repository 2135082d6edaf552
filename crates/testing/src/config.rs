//! Harness configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Configuration for the dev-server guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host the application server listens on
    pub host: String,

    /// Port the application server listens on, as raw text.
    ///
    /// Kept unparsed: a malformed value means "no server to probe", not a
    /// configuration error.
    pub port: String,

    /// Application base directory; working directory for the spawned server
    pub base_path: PathBuf,

    /// The application's command-line entrypoint, resolved against
    /// `base_path` when relative
    pub entrypoint: PathBuf,

    /// TCP connect timeout for the liveness probe, in milliseconds
    pub probe_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: "8000".to_string(),
            base_path: PathBuf::from("."),
            entrypoint: PathBuf::from("helio"),
            probe_timeout_ms: 250,
        }
    }
}

impl ServerConfig {
    /// Build a configuration from the defaults plus the `APP_HOST` and
    /// `APP_PORT` environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a TOML file, falling back to the defaults
    /// when the file does not exist, then apply the environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("APP_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("APP_PORT") {
            self.port = port;
        }
        self
    }

    /// The configured port, if the raw text parses as one
    pub fn port_number(&self) -> Option<u16> {
        self.port.trim().parse().ok()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// The entrypoint resolved against the base path
    pub fn entrypoint_path(&self) -> PathBuf {
        if self.entrypoint.is_absolute() {
            self.entrypoint.clone()
        } else {
            self.base_path.join(&self.entrypoint)
        }
    }
}
