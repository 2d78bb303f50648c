//! Configuration module for the upload server.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, UploadError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upload store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory where uploaded files are stored.
    #[serde(default = "default_upload_path")]
    pub path: String,
    /// Maximum request body size in bytes. Unbounded when absent.
    #[serde(default)]
    pub max_request_size_bytes: Option<u64>,
}

fn default_upload_path() -> String {
    "uploads".to_string()
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            max_request_size_bytes: None,
        }
    }
}

/// Session configuration.
///
/// The secret only signs flash-message cookies; it is not used for access control.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to derive the cookie signing key.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// Name of the cookie carrying flash messages.
    #[serde(default = "default_flash_cookie")]
    pub flash_cookie: String,
}

fn default_secret_key() -> String {
    "dev-secret-key".to_string()
}

fn default_flash_cookie() -> String {
    "flash".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            flash_cookie: default_flash_cookie(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/upload-server.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload store configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(UploadError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| UploadError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `UPLOAD_SERVER_HOST`: bind address
    /// - `UPLOAD_SERVER_PORT`: listen port
    /// - `UPLOAD_SERVER_DIR`: upload store directory
    /// - `UPLOAD_SERVER_SECRET_KEY`: flash cookie signing secret
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(host) = non_empty_env("UPLOAD_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port) = non_empty_env("UPLOAD_SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid UPLOAD_SERVER_PORT value: {}", port),
            }
        }

        if let Some(dir) = non_empty_env("UPLOAD_SERVER_DIR") {
            self.uploads.path = dir;
        }

        if let Some(secret) = non_empty_env("UPLOAD_SERVER_SECRET_KEY") {
            self.session.secret_key = secret;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The upload directory path is empty
    /// - The request size ceiling is set to zero
    /// - The session secret is empty
    pub fn validate(&self) -> Result<()> {
        if self.uploads.path.trim().is_empty() {
            return Err(UploadError::Config("uploads.path must not be empty".to_string()));
        }
        if self.uploads.max_request_size_bytes == Some(0) {
            return Err(UploadError::Config(
                "uploads.max_request_size_bytes must be greater than zero; \
                 omit it for no limit"
                    .to_string(),
            ));
        }
        if self.session.secret_key.is_empty() {
            return Err(UploadError::Config(
                "session.secret_key is not set. \
                 Set it in config.toml or via UPLOAD_SERVER_SECRET_KEY environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
