//! In-memory connection double shared by the unit tests of this crate.

use crate::connection::{ConnectionProvider, ListenerTable};
use crate::ports::connection::{ConnectionError, Listener, ListenerId, PubSubConnection};
use inbox_domain::events;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&Value) -> Option<(String, Value)> + Send + Sync>;

/// A connection whose peer is the test itself.
///
/// Outbound emits are recorded; inbound events are injected with
/// [`deliver`](Self::deliver) or produced by a scripted responder.
pub(crate) struct FakeConnection {
    table: ListenerTable,
    emitted: Mutex<Vec<(String, Value)>>,
    responders: Mutex<HashMap<String, Arc<Responder>>>,
    connected: AtomicBool,
    closed: AtomicBool,
}

impl FakeConnection {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            table: ListenerTable::new(),
            emitted: Mutex::new(Vec::new()),
            responders: Mutex::new(HashMap::new()),
            connected: AtomicBool::new(true),
            closed: AtomicBool::new(false),
        })
    }

    /// Simulate an inbound event. Returns the number of handlers invoked.
    pub(crate) fn deliver(&self, event: &str, payload: Value) -> usize {
        self.table.dispatch(event, &payload)
    }

    /// Answer every emit of `command` with the event returned by `f`.
    pub(crate) fn respond<F>(&self, command: &str, f: F)
    where
        F: Fn(&Value) -> Option<(String, Value)> + Send + Sync + 'static,
    {
        self.responders
            .lock()
            .unwrap()
            .insert(command.to_string(), Arc::new(Box::new(f)));
    }

    pub(crate) fn emitted(&self) -> Vec<(String, Value)> {
        self.emitted.lock().unwrap().clone()
    }

    pub(crate) fn total_listeners(&self) -> usize {
        self.table.total()
    }

    pub(crate) fn disconnect(&self, reason: &str) {
        self.connected.store(false, Ordering::SeqCst);
        self.deliver(events::DISCONNECT, Value::String(reason.to_string()));
    }

    /// Make every further emit fail with [`ConnectionError::Closed`]
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl PubSubConnection for FakeConnection {
    fn id(&self) -> Option<String> {
        Some("fake-sid".to_string())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn on(&self, event: &str, listener: Listener) -> ListenerId {
        self.table.add(event, listener, false)
    }

    fn once(&self, event: &str, listener: Listener) -> ListenerId {
        self.table.add(event, listener, true)
    }

    fn off(&self, event: &str, id: ListenerId) -> bool {
        self.table.remove(event, id)
    }

    fn listener_count(&self, event: &str) -> usize {
        self.table.count(event)
    }

    fn emit(&self, event: &str, payload: Value) -> Result<(), ConnectionError> {
        if events::is_reserved(event) {
            return Err(ConnectionError::ReservedEvent(event.to_string()));
        }
        if self.closed.load(Ordering::SeqCst) {
            return Err(ConnectionError::Closed);
        }
        self.emitted
            .lock()
            .unwrap()
            .push((event.to_string(), payload.clone()));

        let responder = self.responders.lock().unwrap().get(event).cloned();
        if let Some(responder) = responder
            && let Some((reply, body)) = responder(&payload)
        {
            self.deliver(&reply, body);
        }
        Ok(())
    }
}

/// Provider whose factory hands out `fake`
pub(crate) fn provider_for(fake: &Arc<FakeConnection>) -> Arc<ConnectionProvider> {
    let fake = Arc::clone(fake);
    Arc::new(ConnectionProvider::new(move || {
        Arc::clone(&fake) as Arc<dyn PubSubConnection>
    }))
}
