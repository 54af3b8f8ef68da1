//! Configuration file loading for inbox-link
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `INBOX_WS_URL` and other `INBOX_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./inbox.toml` or `./.inbox.toml`
//! 4. Global config: `<config_dir>/inbox-link/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBridgeConfig, FileConfig, FileLoggingConfig, FileServerConfig,
    FileSessionConfig,
};
pub use loader::{ConfigLoader, WS_URL_ENV};
