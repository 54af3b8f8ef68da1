//! Connection settings for the Socket.IO adapter.

use super::error::{Result, SocketError};
use std::time::Duration;

/// Default server address when nothing is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Fixed settings of the shared connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConfig {
    /// Server origin, `http(s)://` or `ws(s)://`
    pub url: String,
    /// Engine.IO mount path
    pub path: String,
    /// Attach the stored token to the handshake
    pub with_credentials: bool,
    /// Give up on the WebSocket handshake after this long
    pub connect_timeout: Duration,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            path: "/socket.io".to_string(),
            with_credentials: true,
            connect_timeout: Duration::from_secs(20),
        }
    }
}

impl SocketConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// WebSocket endpoint, e.g. `ws://localhost:3000/socket.io/?EIO=4&transport=websocket`.
    pub fn endpoint(&self) -> Result<String> {
        let invalid = |reason: &str| SocketError::InvalidUrl {
            url: self.url.clone(),
            reason: reason.to_string(),
        };

        let url = self.url.trim();
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme"))?;
        let ws_scheme = match scheme.to_ascii_lowercase().as_str() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            _ => return Err(invalid("scheme must be http, https, ws or wss")),
        };

        let authority = rest.trim_end_matches('/');
        if authority.is_empty() {
            return Err(invalid("missing host"));
        }
        if authority.contains('/') {
            return Err(invalid("namespaces are not supported"));
        }

        let path = self.path.trim_end_matches('/');
        Ok(format!(
            "{}://{}{}/?EIO=4&transport=websocket",
            ws_scheme, authority, path
        ))
    }
}
