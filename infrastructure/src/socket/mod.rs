//! Socket.IO adapter for the [`PubSubConnection`] port.
//!
//! - [`codec`]: Engine.IO / Socket.IO v4 text frames
//! - [`connection::SocketIoConnection`]: the WebSocket-backed connection
//! - [`shared_provider`]: the process-wide connection provider

pub mod codec;
pub mod config;
pub mod connection;
pub mod error;

pub use config::{DEFAULT_SERVER_URL, SocketConfig};
pub use connection::SocketIoConnection;
pub use error::SocketError;

use inbox_application::ports::connection::PubSubConnection;
use inbox_application::ports::token_store::TokenStore;
use inbox_application::ports::traffic_logger::TrafficLogger;
use inbox_application::ConnectionProvider;
use std::sync::{Arc, OnceLock};
use tracing::warn;

static SHARED_PROVIDER: OnceLock<Arc<ConnectionProvider>> = OnceLock::new();

/// Factory for [`ConnectionProvider::new`].
///
/// The stored token is read when the connection is created, not when the
/// factory is built.
pub fn connection_factory(
    config: SocketConfig,
    tokens: Arc<dyn TokenStore>,
    traffic: Arc<dyn TrafficLogger>,
) -> impl Fn() -> Arc<dyn PubSubConnection> + Send + Sync + 'static {
    move || {
        let token = if config.with_credentials {
            tokens.load().unwrap_or_else(|e| {
                warn!("Could not read stored token: {}", e);
                None
            })
        } else {
            None
        };
        SocketIoConnection::open(config.clone(), token, Arc::clone(&traffic)) as Arc<dyn PubSubConnection>
    }
}

/// The process-wide provider. The first caller's settings win.
pub fn shared_provider(
    config: SocketConfig,
    tokens: Arc<dyn TokenStore>,
    traffic: Arc<dyn TrafficLogger>,
) -> Arc<ConnectionProvider> {
    let provider = SHARED_PROVIDER.get_or_init(|| {
        Arc::new(ConnectionProvider::new(connection_factory(
            config, tokens, traffic,
        )))
    });
    Arc::clone(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_application::{MemoryTokenStore, NoTrafficLogger};

    #[test]
    fn test_shared_provider_is_process_wide_and_lazy() {
        let first = shared_provider(
            SocketConfig::default(),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(NoTrafficLogger),
        );
        let second = shared_provider(
            SocketConfig::new("http://elsewhere:1"),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(NoTrafficLogger),
        );

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!first.is_initialized());
    }
}
