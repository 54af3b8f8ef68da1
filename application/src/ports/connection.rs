//! Pub/sub connection port
//!
//! Defines the interface of the shared, bidirectional named-event channel.
//! The Socket.IO adapter lives in the infrastructure layer; every other
//! component only holds an `Arc<dyn PubSubConnection>`.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// A registered event handler.
///
/// Closures have no identity of their own, so registrations are identified by
/// the [`ListenerId`] returned from [`PubSubConnection::on`] / [`PubSubConnection::once`].
pub type Listener = Arc<dyn Fn(Value) + Send + Sync>;

/// Identifier of one listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised synchronously by the connection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,

    #[error("Reserved event name cannot be emitted: {0}")]
    ReservedEvent(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// A long-lived, named-event pub/sub channel.
///
/// Listener table semantics shared by every implementation:
///
/// - standing listeners (`on`) fire on every emission of their event;
/// - one-shot listeners (`once`) registered on the same event are served in
///   registration order, one emission each, and are removed after firing;
/// - handlers run outside any internal lock and may call `on`/`off`.
pub trait PubSubConnection: Send + Sync {
    /// Identifier assigned by the peer once connected
    fn id(&self) -> Option<String>;

    /// Whether the handshake with the peer has completed and not ended
    fn is_connected(&self) -> bool;

    /// Register a standing listener
    fn on(&self, event: &str, listener: Listener) -> ListenerId;

    /// Register a one-shot listener
    fn once(&self, event: &str, listener: Listener) -> ListenerId;

    /// Remove exactly one registration. Returns false if it was already gone.
    fn off(&self, event: &str, id: ListenerId) -> bool;

    /// Number of listeners currently registered for `event`
    fn listener_count(&self, event: &str) -> usize;

    /// Send `event` with `payload` to the peer.
    ///
    /// Fire-and-forget: returns once the frame is queued, not when the peer
    /// has received it.
    fn emit(&self, event: &str, payload: Value) -> Result<(), ConnectionError>;
}
