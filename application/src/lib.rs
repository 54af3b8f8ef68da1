//! Application layer for inbox-link
//!
//! This crate contains the ports, the connection provider, the request bridge,
//! subscriptions and the session manager. It depends only on the domain layer.

pub mod config;
pub mod connection;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::BridgeConfig;
pub use connection::{ConnectionProvider, ListenerTable};
pub use ports::{
    auth_gateway::AuthGateway,
    connection::{ConnectionError, Listener, ListenerId, PubSubConnection},
    token_store::{MemoryTokenStore, TokenStore, TokenStoreError},
    traffic_logger::{Direction, NoTrafficLogger, TrafficEvent, TrafficLogger},
};
pub use use_cases::bridge_auth::BridgeAuthGateway;
pub use use_cases::inbox_api::InboxApi;
pub use use_cases::request_bridge::{BridgeError, PendingReply, RemoteError, RequestBridge};
pub use use_cases::session_manager::{SessionError, SessionManager};
pub use use_cases::subscriptions::{Subscription, subscribe, subscribe_typed};
