//! Subscriptions to push events.
//!
//! A [`Subscription`] is a standing listener plus the means to remove exactly
//! that listener again. Several subscriptions on the same event coexist and
//! are disposed independently.

use crate::ports::connection::{ListenerId, PubSubConnection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{trace, warn};

/// Handle to one standing registration.
///
/// Dropping it leaves the listener in place; call [`dispose`](Self::dispose)
/// to unsubscribe.
#[must_use = "a subscription stays registered until dispose() is called"]
pub struct Subscription {
    connection: Arc<dyn PubSubConnection>,
    event: String,
    id: ListenerId,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove this subscription's listener. Returns false if it was already gone.
    pub fn dispose(self) -> bool {
        let removed = self.connection.off(&self.event, self.id);
        trace!("subscription {} on '{}' disposed", self.id, self.event);
        removed
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish()
    }
}

/// Register `handler` for every emission of `event`.
pub fn subscribe<F>(connection: &Arc<dyn PubSubConnection>, event: &str, handler: F) -> Subscription
where
    F: Fn(Value) + Send + Sync + 'static,
{
    let id = connection.on(event, Arc::new(handler));
    trace!("subscription {} on '{}' registered", id, event);
    Subscription {
        connection: Arc::clone(connection),
        event: event.to_string(),
        id,
    }
}

/// Like [`subscribe`], decoding each payload into `T`.
///
/// Payloads that do not decode are logged and skipped.
pub fn subscribe_typed<T, F>(
    connection: &Arc<dyn PubSubConnection>,
    event: &str,
    handler: F,
) -> Subscription
where
    T: DeserializeOwned,
    F: Fn(T) + Send + Sync + 'static,
{
    let name = event.to_string();
    subscribe(connection, event, move |value| {
        match serde_json::from_value::<T>(value) {
            Ok(decoded) => handler(decoded),
            Err(e) => warn!("Ignoring malformed '{}' payload: {}", name, e),
        }
    })
}
