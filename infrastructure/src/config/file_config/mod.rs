//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into runtime settings.

mod bridge;
mod logging;
mod server;
mod session;

pub use bridge::FileBridgeConfig;
pub use logging::FileLoggingConfig;
pub use server::FileServerConfig;
pub use session::FileSessionConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("server.url cannot be empty")]
    EmptyUrl,

    #[error("server.url must start with http://, https://, ws:// or wss:// (got '{0}')")]
    InvalidScheme(String),

    #[error("bridge.request_timeout_seconds cannot be 0")]
    InvalidTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Server connection settings
    pub server: FileServerConfig,
    /// Request bridge settings
    pub bridge: FileBridgeConfig,
    /// Session persistence settings
    pub session: FileSessionConfig,
    /// Traffic logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let url = self.server.url.trim();
        if url.is_empty() {
            return Err(ConfigValidationError::EmptyUrl);
        }

        let scheme = url.split_once("://").map(|(s, _)| s.to_ascii_lowercase());
        if !matches!(scheme.as_deref(), Some("http" | "https" | "ws" | "wss")) {
            return Err(ConfigValidationError::InvalidScheme(url.to_string()));
        }

        if let Some(0) = self.bridge.request_timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        Ok(())
    }
}
