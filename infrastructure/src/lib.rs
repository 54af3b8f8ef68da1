//! Infrastructure layer for inbox-link
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod socket;
pub mod token_store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBridgeConfig, FileConfig, FileLoggingConfig,
    FileServerConfig, FileSessionConfig, WS_URL_ENV,
};
pub use logging::JsonlTrafficLogger;
pub use socket::{
    DEFAULT_SERVER_URL, SocketConfig, SocketError, SocketIoConnection, connection_factory,
    shared_provider,
};
pub use token_store::FileTokenStore;
