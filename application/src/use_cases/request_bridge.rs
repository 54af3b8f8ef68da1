//! Request/response bridge: one awaitable call per correlated event pair.
//!
//! The shared connection only knows named events. [`RequestBridge::send`]
//! turns "emit a command, wait for the matching success or error event" into
//! a [`PendingReply`] future:
//!
//! 1. a one-shot listener on the success event fulfils the future;
//! 2. a one-shot listener on the error event rejects it;
//! 3. optionally, standing listeners on `disconnect` / `connect_error` reject
//!    it when the transport goes away;
//! 4. the command is emitted and the future is returned immediately.
//!
//! Whichever trigger fires first removes **every** listener of the call
//! through the call's [`PendingGuard`], so a later emission of the same event
//! names can never reach a settled request. Dropping an unsettled
//! `PendingReply` releases the guard as well.

use crate::config::BridgeConfig;
use crate::connection::ConnectionProvider;
use crate::connection::provider::reason_text;
use crate::ports::connection::{ConnectionError, ListenerId, PubSubConnection};
use inbox_domain::{Command, events};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// Error value delivered by the peer on an error event
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    value: Value,
}

impl RemoteError {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Raw error value as sent by the peer
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Best-effort human-readable message
    pub fn message(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("message")
                .or_else(|| map.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| self.value.to_string()),
            Value::Null => "unknown error".to_string(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Errors that can settle a bridged request
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Peer rejected the request: {0}")]
    Remote(RemoteError),

    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Disconnected before a reply arrived: {0}")]
    Disconnected(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request abandoned")]
    Abandoned,
}

impl BridgeError {
    /// The peer answered on the error channel (as opposed to a local failure)
    pub fn is_remote(&self) -> bool {
        matches!(self, BridgeError::Remote(_))
    }
}

/// How a request was settled, before decoding
#[derive(Debug)]
enum Outcome {
    Success(Value),
    Remote(Value),
    Disconnected(String),
}

/// Owns every listener registration of one request.
///
/// [`release`](Self::release) is idempotent: the first call removes all
/// tracked listeners, later calls do nothing. Registrations tracked after a
/// release are removed immediately.
pub struct PendingGuard {
    connection: Weak<dyn PubSubConnection>,
    state: Mutex<GuardState>,
}

#[derive(Default)]
struct GuardState {
    released: bool,
    registrations: Vec<(String, ListenerId)>,
}

impl PendingGuard {
    fn new(connection: &Arc<dyn PubSubConnection>) -> Self {
        Self {
            connection: Arc::downgrade(connection),
            state: Mutex::new(GuardState::default()),
        }
    }

    fn track(&self, event: &str, id: ListenerId) {
        let released = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if !state.released {
                state.registrations.push((event.to_string(), id));
            }
            state.released
        };
        if released && let Some(connection) = self.connection.upgrade() {
            connection.off(event, id);
        }
    }

    /// Remove every tracked listener. Returns how many were still registered.
    pub fn release(&self) -> usize {
        let registrations = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.released = true;
            std::mem::take(&mut state.registrations)
        };
        let Some(connection) = self.connection.upgrade() else {
            return 0;
        };
        registrations
            .iter()
            .filter(|(event, id)| connection.off(event, *id))
            .count()
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).released
    }
}

/// Shared between the listeners of one request and its future.
struct PendingState {
    sender: Mutex<Option<oneshot::Sender<Outcome>>>,
    guard: PendingGuard,
}

impl PendingState {
    fn settle(&self, outcome: Outcome) {
        self.guard.release();
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(tx) = sender {
            let _ = tx.send(outcome);
        }
    }
}

enum Inner {
    Failed(Option<BridgeError>),
    Waiting {
        rx: oneshot::Receiver<Outcome>,
        state: Arc<PendingState>,
    },
}

/// Future of one bridged request.
///
/// Resolves to the decoded success payload or a [`BridgeError`]. The command
/// has already been emitted by the time this value exists.
#[must_use = "dropping a PendingReply abandons the request"]
pub struct PendingReply<R> {
    inner: Inner,
    _response: PhantomData<fn() -> R>,
}

impl<R> PendingReply<R> {
    fn failed(error: BridgeError) -> Self {
        Self {
            inner: Inner::Failed(Some(error)),
            _response: PhantomData,
        }
    }

    fn waiting(rx: oneshot::Receiver<Outcome>, state: Arc<PendingState>) -> Self {
        Self {
            inner: Inner::Waiting { rx, state },
            _response: PhantomData,
        }
    }

    /// Whether the request's listeners have already been removed
    pub fn is_settled(&self) -> bool {
        match &self.inner {
            Inner::Failed(_) => true,
            Inner::Waiting { state, .. } => state.guard.is_released(),
        }
    }
}

impl<R: DeserializeOwned> PendingReply<R> {
    /// Wait at most `timeout`; on expiry the request is abandoned and its
    /// listeners are removed.
    pub async fn timeout(self, timeout: Duration) -> Result<R, BridgeError> {
        match tokio::time::timeout(timeout, self).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout(timeout)),
        }
    }
}

impl<R: DeserializeOwned> Future for PendingReply<R> {
    type Output = Result<R, BridgeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.inner {
            Inner::Failed(error) => Poll::Ready(Err(error.take().unwrap_or(BridgeError::Abandoned))),
            Inner::Waiting { rx, .. } => match Pin::new(rx).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(Outcome::Success(value))) => {
                    Poll::Ready(serde_json::from_value(value).map_err(BridgeError::Decode))
                }
                Poll::Ready(Ok(Outcome::Remote(value))) => {
                    Poll::Ready(Err(BridgeError::Remote(RemoteError::new(value))))
                }
                Poll::Ready(Ok(Outcome::Disconnected(reason))) => {
                    Poll::Ready(Err(BridgeError::Disconnected(reason)))
                }
                Poll::Ready(Err(_)) => Poll::Ready(Err(BridgeError::Abandoned)),
            },
        }
    }
}

impl<R> Drop for PendingReply<R> {
    fn drop(&mut self) {
        if let Inner::Waiting { state, .. } = &self.inner {
            let removed = state.guard.release();
            if removed > 0 {
                debug!("Bridge: abandoned request released {} listeners", removed);
            }
        }
    }
}

/// Correlates commands with their reply events on the shared connection.
pub struct RequestBridge {
    provider: Arc<ConnectionProvider>,
    config: BridgeConfig,
}

impl RequestBridge {
    pub fn new(provider: Arc<ConnectionProvider>, config: BridgeConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The shared connection (created on first use)
    pub fn connection(&self) -> Arc<dyn PubSubConnection> {
        self.provider.get()
    }

    /// Emit `command` and settle on the next `success_event` or `error_event`.
    pub fn send<P, R>(
        &self,
        command: &str,
        payload: &P,
        success_event: &str,
        error_event: &str,
    ) -> PendingReply<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let connection = self.provider.get();

        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => return PendingReply::failed(BridgeError::Encode(e)),
        };

        let (tx, rx) = oneshot::channel();
        let state = Arc::new(PendingState {
            sender: Mutex::new(Some(tx)),
            guard: PendingGuard::new(&connection),
        });

        let on_success = Arc::clone(&state);
        let id = connection.once(
            success_event,
            Arc::new(move |value| on_success.settle(Outcome::Success(value))),
        );
        state.guard.track(success_event, id);

        let on_error = Arc::clone(&state);
        let id = connection.once(
            error_event,
            Arc::new(move |value| on_error.settle(Outcome::Remote(value))),
        );
        state.guard.track(error_event, id);

        if self.config.reject_on_disconnect {
            for lifecycle in [events::DISCONNECT, events::CONNECT_ERROR] {
                let on_lost = Arc::clone(&state);
                let id = connection.on(
                    lifecycle,
                    Arc::new(move |value| {
                        on_lost.settle(Outcome::Disconnected(reason_text(&value)))
                    }),
                );
                state.guard.track(lifecycle, id);
            }
        }

        trace!(
            "Bridge: {} -> awaiting '{}' / '{}'",
            command, success_event, error_event
        );

        if let Err(e) = connection.emit(command, payload) {
            state.guard.release();
            return PendingReply::failed(BridgeError::Connection(e));
        }

        PendingReply::waiting(rx, state)
    }

    /// [`send`](Self::send) on the shared default error channel (`"error"`).
    pub fn send_default<P, R>(&self, command: &str, payload: &P, success_event: &str) -> PendingReply<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(command, payload, success_event, events::ERROR)
    }

    /// Emit a typed [`Command`].
    pub fn request<C: Command>(&self, command: &C) -> PendingReply<C::Response> {
        self.send(C::NAME, command, C::SUCCESS_EVENT, C::ERROR_EVENT)
    }

    /// Emit a typed [`Command`] and await it under the configured deadline.
    pub async fn call<C: Command>(&self, command: &C) -> Result<C::Response, BridgeError> {
        let pending = self.request(command);
        match self.config.request_timeout {
            Some(timeout) => pending.timeout(timeout).await,
            None => pending.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeConnection, provider_for};
    use futures::FutureExt;
    use inbox_domain::{GetMessages, Message};
    use serde_json::json;

    fn bridge(fake: &Arc<FakeConnection>) -> RequestBridge {
        RequestBridge::new(provider_for(fake), BridgeConfig::default())
    }

    /// The provider's connect/disconnect observers
    const DIAGNOSTIC_OBSERVERS: usize = 2;

    fn total_listeners(fake: &FakeConnection) -> usize {
        fake.total_listeners() - DIAGNOSTIC_OBSERVERS
    }

    #[test]
    fn test_send_emits_exactly_once() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let _pending: PendingReply<Value> =
            bridge.send_default("getMessages", &json!({ "conversationId": 4 }), "messages");

        assert_eq!(
            fake.emitted(),
            vec![("getMessages".to_string(), json!({ "conversationId": 4 }))]
        );
    }

    #[tokio::test]
    async fn test_success_fulfils_and_removes_all_listeners() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let pending: PendingReply<Vec<i64>> = bridge.send_default("getConversations", &(), "conversations");
        assert_eq!(fake.listener_count("conversations"), 1);
        assert_eq!(fake.listener_count("error"), 1);
        assert_eq!(fake.listener_count(events::DISCONNECT), 1 + 1);

        assert_eq!(fake.deliver("conversations", json!([1, 2, 3])), 1);
        assert_eq!(pending.await.unwrap(), vec![1, 2, 3]);
        assert_eq!(total_listeners(&fake), 0);

        // A later error emission reaches nobody
        assert_eq!(fake.deliver("error", json!("late")), 0);
    }

    #[tokio::test]
    async fn test_error_rejects_and_removes_all_listeners() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let pending: PendingReply<Value> = bridge.send_default("sendReply", &json!({}), "replySent");
        fake.deliver("error", json!({ "message": "conversation not found" }));

        let err = pending.await.unwrap_err();
        assert!(err.is_remote());
        assert_eq!(err.to_string(), "Peer rejected the request: conversation not found");
        assert_eq!(total_listeners(&fake), 0);
        assert_eq!(fake.deliver("replySent", json!({ "success": true })), 0);
    }

    #[tokio::test]
    async fn test_settled_future_ignores_later_emissions() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let mut pending: PendingReply<i64> = bridge.send_default("cmd", &(), "ok");
        fake.deliver("ok", json!(1));
        assert!(pending.is_settled());
        fake.deliver("ok", json!(2));
        fake.deliver("error", json!("boom"));

        assert_eq!((&mut pending).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_distinct_event_pairs_do_not_interfere() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let first: PendingReply<String> = bridge.send("a", &(), "a.ok", "a.err");
        let mut second: PendingReply<String> = bridge.send("b", &(), "b.ok", "b.err");

        fake.deliver("a.ok", json!("first"));
        assert!((&mut second).now_or_never().is_none());

        fake.deliver("b.err", json!("second failed"));
        assert_eq!(first.await.unwrap(), "first");
        assert!(matches!(second.await, Err(BridgeError::Remote(_))));
    }

    #[tokio::test]
    async fn test_shared_error_channel_rejects_only_oldest_request() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let first: PendingReply<Value> = bridge.send_default("getMessages", &json!({}), "messages");
        let mut second: PendingReply<Value> = bridge.send_default("sendReply", &json!({}), "replySent");

        assert_eq!(fake.deliver("error", json!("boom")), 1);
        assert!(first.await.is_err());
        assert!((&mut second).now_or_never().is_none());

        fake.deliver("replySent", json!({ "success": true }));
        assert_eq!(second.await.unwrap(), json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_same_success_event_is_matched_in_fifo_order() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let first: PendingReply<i64> = bridge.send_default("getMessages", &json!({ "id": 1 }), "messages");
        let second: PendingReply<i64> = bridge.send_default("getMessages", &json!({ "id": 2 }), "messages");

        fake.deliver("messages", json!(1));
        fake.deliver("messages", json!(2));

        assert_eq!(first.await.unwrap(), 1);
        assert_eq!(second.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_disconnect_rejects_all_outstanding_requests() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let first: PendingReply<Value> = bridge.send_default("getConversations", &(), "conversations");
        let second: PendingReply<Value> = bridge.send("getCurrentUser", &(), "currentUser", "authError");

        fake.disconnect("transport close");

        match first.await {
            Err(BridgeError::Disconnected(reason)) => assert_eq!(reason, "transport close"),
            other => panic!("expected Disconnected, got {:?}", other),
        }
        assert!(matches!(second.await, Err(BridgeError::Disconnected(_))));
        assert_eq!(total_listeners(&fake), 0);
    }

    #[tokio::test]
    async fn test_disconnect_leaves_requests_pending_when_disabled() {
        let fake = FakeConnection::new();
        let bridge = RequestBridge::new(
            provider_for(&fake),
            BridgeConfig::default().with_reject_on_disconnect(false),
        );

        let mut pending: PendingReply<Value> = bridge.send_default("getConversations", &(), "conversations");
        fake.disconnect("ping timeout");
        assert!((&mut pending).now_or_never().is_none());
        assert_eq!(fake.listener_count("conversations"), 1);

        fake.deliver("conversations", json!([]));
        assert_eq!(pending.await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_connect_error_rejects_request() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let pending: PendingReply<Value> = bridge.send_default("getConversations", &(), "conversations");
        fake.deliver(events::CONNECT_ERROR, json!({ "message": "xhr poll error" }));

        match pending.await {
            Err(BridgeError::Disconnected(reason)) => assert_eq!(reason, "xhr poll error"),
            other => panic!("expected Disconnected, got {:?}", other),
        }
    }

    #[test]
    fn test_dropping_pending_reply_releases_listeners() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let pending: PendingReply<Value> = bridge.send_default("getConversations", &(), "conversations");
        assert_eq!(total_listeners(&fake), 4);

        drop(pending);
        assert_eq!(total_listeners(&fake), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_abandons_request() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let pending: PendingReply<Value> = bridge.send_default("getConversations", &(), "conversations");
        let err = pending.timeout(Duration::from_secs(5)).await.unwrap_err();

        assert!(matches!(err, BridgeError::Timeout(d) if d == Duration::from_secs(5)));
        assert_eq!(total_listeners(&fake), 0);
    }

    #[tokio::test]
    async fn test_emit_failure_rejects_immediately_and_cleans_up() {
        let fake = FakeConnection::new();
        fake.close();
        let bridge = bridge(&fake);

        let pending: PendingReply<Value> = bridge.send_default("getConversations", &(), "conversations");
        assert!(matches!(
            pending.await,
            Err(BridgeError::Connection(ConnectionError::Closed))
        ));
        assert_eq!(total_listeners(&fake), 0);
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported() {
        let fake = FakeConnection::new();
        let bridge = bridge(&fake);

        let pending: PendingReply<Vec<Message>> = bridge.send_default("getMessages", &(), "messages");
        fake.deliver("messages", json!({ "not": "a list" }));

        assert!(matches!(pending.await, Err(BridgeError::Decode(_))));
    }

    #[tokio::test]
    async fn test_typed_request_uses_command_contract() {
        let fake = FakeConnection::new();
        fake.respond("getMessages", |payload| {
            assert_eq!(payload, &json!({ "conversationId": 9 }));
            Some(("messages".to_string(), json!([{ "id": 1, "text": "hi" }])))
        });
        let bridge = bridge(&fake);

        let messages = bridge.call(&GetMessages { conversation_id: 9 }).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "hi");
    }

    #[test]
    fn test_remote_error_message_extraction() {
        assert_eq!(RemoteError::new(json!("plain")).message(), "plain");
        assert_eq!(RemoteError::new(json!({ "error": "denied" })).message(), "denied");
        assert_eq!(RemoteError::new(json!({ "code": 4 })).message(), "{\"code\":4}");
        assert_eq!(RemoteError::new(json!(null)).message(), "unknown error");
    }
}
