//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `cimi-browser.toml` in the working directory unless a path is
//! given on the command line. Every field has a sensible default so the file
//! is optional. Environment variables take precedence over file values, and
//! command-line flags over both.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use cimi_browser_adapter_http_reqwest::HttpClientConfig;

use crate::cli::Cli;

/// File read when no `--config` is given.
pub const DEFAULT_PATH: &str = "cimi-browser.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// CIMI server settings.
    pub cimi: CimiConfig,
    /// Outgoing HTTP client settings.
    pub http: HttpClientConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `127.0.0.1`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// The CIMI server being browsed.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CimiConfig {
    /// Base endpoint every reference resolves against.
    pub base_url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (or `cimi-browser.toml` if present)
    /// then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, or if the
    /// TOML file exists but is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => Self::from_file(Path::new(DEFAULT_PATH))?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("CIMI_BROWSER_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("CIMI_BROWSER_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("CIMI_BROWSER_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("CIMI_BASE_URL") {
            self.cimi.base_url = val;
        }
        if let Some(val) = var("CIMI_BROWSER_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Apply command-line flags, which win over file and environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.cimi.base_url.clone_from(base_url);
        }
        if cli.verbose {
            self.logging.filter = "cimi_browser=debug,cimi_browser_app=debug,tower_http=debug".to_string();
        }
    }

    /// Check the values that have no usable fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero port or an empty base
    /// URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.cimi.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "base URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for CimiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/cimi/".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "cimi_browser=info,cimi_browser_app=info,tower_http=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A file named on the command line does not exist.
    #[error("config file {} not found", .0.display())]
    Missing(PathBuf),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
