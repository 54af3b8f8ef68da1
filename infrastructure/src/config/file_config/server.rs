//! Server configuration from TOML (`[server]` section)

use crate::socket::{DEFAULT_SERVER_URL, SocketConfig};
use serde::{Deserialize, Serialize};

/// Raw server configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Server origin (`http(s)://` or `ws(s)://`)
    pub url: String,
    /// Attach the stored token to the connection handshake
    pub with_credentials: bool,
    /// Base URL of the auth server for OAuth links (defaults to `url`)
    pub auth_url: Option<String>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            with_credentials: true,
            auth_url: None,
        }
    }
}

impl FileServerConfig {
    pub fn to_socket_config(&self) -> SocketConfig {
        SocketConfig::new(self.url.clone()).with_credentials(self.with_credentials)
    }

    /// Where OAuth flows start
    ///
    /// Without an explicit `auth_url` the server URL is used, with `ws(s)://`
    /// mapped to `http(s)://` so the link opens in a browser.
    pub fn auth_base_url(&self) -> String {
        if let Some(auth_url) = &self.auth_url {
            return auth_url.clone();
        }

        let url = self.url.trim();
        match url.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("ws") => {
                format!("http://{}", rest)
            }
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("wss") => {
                format!("https://{}", rest)
            }
            _ => url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_base_url_falls_back_to_server() {
        let mut config = FileServerConfig::default();
        assert_eq!(config.auth_base_url(), DEFAULT_SERVER_URL);

        config.auth_url = Some("https://auth.example.com".into());
        assert_eq!(config.auth_base_url(), "https://auth.example.com");
    }

    #[test]
    fn test_auth_base_url_maps_websocket_schemes() {
        let mut config = FileServerConfig {
            url: "wss://inbox.example.com".into(),
            ..FileServerConfig::default()
        };
        assert_eq!(config.auth_base_url(), "https://inbox.example.com");

        config.url = "ws://localhost:3000".into();
        assert_eq!(config.auth_base_url(), "http://localhost:3000");

        config.auth_url = Some("wss://auth.example.com".into());
        assert_eq!(config.auth_base_url(), "wss://auth.example.com");
    }

    #[test]
    fn test_to_socket_config() {
        let config = FileServerConfig {
            url: "https://inbox.example.com".into(),
            with_credentials: false,
            auth_url: None,
        };
        let socket = config.to_socket_config();
        assert_eq!(socket.url, "https://inbox.example.com");
        assert!(!socket.with_credentials);
    }
}
