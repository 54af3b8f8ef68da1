//! Error types for the Socket.IO adapter

use thiserror::Error;

/// Result type alias for socket operations
pub type Result<T> = std::result::Result<T, SocketError>;

/// Errors that can occur when talking to a Socket.IO server
#[derive(Error, Debug)]
pub enum SocketError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Handshake failed: {0}")]
    Handshake(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for SocketError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        SocketError::WebSocket(Box::new(e))
    }
}
