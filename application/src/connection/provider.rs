//! Connection provider: lazy, create-once owner of the shared connection.
//!
//! Nothing touches the network until the first [`ConnectionProvider::get`].
//! From then on every caller receives the same `Arc`; the factory never runs
//! a second time, even when several tasks race on the first call.

use crate::ports::connection::PubSubConnection;
use inbox_domain::events;
use serde_json::Value;
use std::sync::{Arc, OnceLock, Weak};
use tracing::info;

type ConnectionFactory = Box<dyn Fn() -> Arc<dyn PubSubConnection> + Send + Sync>;

/// Owner of the single shared [`PubSubConnection`].
pub struct ConnectionProvider {
    factory: ConnectionFactory,
    connection: OnceLock<Arc<dyn PubSubConnection>>,
}

impl ConnectionProvider {
    /// Build a provider around a connection factory.
    ///
    /// The factory holds the fixed configuration (address, transport,
    /// credentials) and is invoked at most once.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn PubSubConnection> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            connection: OnceLock::new(),
        }
    }

    /// Return the shared connection, creating it on the first call.
    pub fn get(&self) -> Arc<dyn PubSubConnection> {
        let connection = self.connection.get_or_init(|| {
            let connection = (self.factory)();
            attach_diagnostics(&connection);
            connection
        });
        Arc::clone(connection)
    }

    /// Whether the connection has been created yet
    pub fn is_initialized(&self) -> bool {
        self.connection.get().is_some()
    }
}

impl std::fmt::Debug for ConnectionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionProvider")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Log connect and disconnect. Purely diagnostic.
fn attach_diagnostics(connection: &Arc<dyn PubSubConnection>) {
    let weak: Weak<dyn PubSubConnection> = Arc::downgrade(connection);
    connection.on(
        events::CONNECT,
        Arc::new(move |_| {
            let id = weak.upgrade().and_then(|c| c.id());
            info!("[socket] connected {}", id.as_deref().unwrap_or("<unknown>"));
        }),
    );
    connection.on(
        events::DISCONNECT,
        Arc::new(|reason: Value| {
            info!("[socket] disconnected {}", reason_text(&reason));
        }),
    );
}

/// Render a lifecycle payload (usually a bare string) for logs and errors.
pub(crate) fn reason_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "unknown".to_string(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}
