//! Listener table shared by connection implementations.
//!
//! Stores handlers per event name and implements the dispatch rules of
//! [`PubSubConnection`](crate::ports::connection::PubSubConnection):
//! standing listeners always fire, and a single emission is consumed by the
//! oldest one-shot listener of that event.

use crate::ports::connection::{Listener, ListenerId};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

struct Entry {
    id: ListenerId,
    once: bool,
    handler: Listener,
}

/// Per-event listener registry.
///
/// The internal lock is only held for map edits; handlers are cloned out and
/// invoked after it is released so they can (de)register listeners freely.
pub struct ListenerTable {
    next_id: AtomicU64,
    entries: Mutex<HashMap<String, Vec<Entry>>>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a handler; `once` marks it as a one-shot listener.
    pub fn add(&self, event: &str, handler: Listener, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.entry(event.to_string()).or_default().push(Entry { id, once, handler });
        trace!("listener {} added for '{}' (once={})", id, event, once);
        id
    }

    /// Remove one registration. Returns false if it was not present.
    pub fn remove(&self, event: &str, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let Some(list) = entries.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|entry| entry.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            entries.remove(event);
        }
        removed
    }

    /// Number of listeners registered for `event`
    pub fn count(&self, event: &str) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(event).map_or(0, Vec::len)
    }

    /// Number of listeners across all events
    pub fn total(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.values().map(Vec::len).sum()
    }

    /// Deliver `payload` to the listeners of `event`.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, event: &str, payload: &Value) -> usize {
        let handlers: Vec<Listener> = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            let Some(list) = entries.get_mut(event) else {
                return 0;
            };

            let mut consumed: Option<ListenerId> = None;
            let mut handlers = Vec::with_capacity(list.len());
            for entry in list.iter() {
                if !entry.once {
                    handlers.push(entry.handler.clone());
                } else if consumed.is_none() {
                    consumed = Some(entry.id);
                    handlers.push(entry.handler.clone());
                }
            }

            if let Some(id) = consumed {
                list.retain(|entry| entry.id != id);
            }
            if list.is_empty() {
                entries.remove(event);
            }
            handlers
        };

        for handler in &handlers {
            handler(payload.clone());
        }
        handlers.len()
    }
}

impl Default for ListenerTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<Value>>>, Listener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: Listener = Arc::new(move |value| sink.lock().unwrap().push(value));
        (seen, listener)
    }

    #[test]
    fn test_standing_listeners_all_fire() {
        let table = ListenerTable::new();
        let (a, la) = recorder();
        let (b, lb) = recorder();
        table.add("newMessage", la, false);
        table.add("newMessage", lb, false);

        assert_eq!(table.dispatch("newMessage", &json!(1)), 2);
        assert_eq!(table.dispatch("newMessage", &json!(2)), 2);

        assert_eq!(*a.lock().unwrap(), vec![json!(1), json!(2)]);
        assert_eq!(*b.lock().unwrap(), vec![json!(1), json!(2)]);
        assert_eq!(table.count("newMessage"), 2);
    }

    #[test]
    fn test_one_shot_listeners_are_served_in_order() {
        let table = ListenerTable::new();
        let (first, l1) = recorder();
        let (second, l2) = recorder();
        table.add("error", l1, true);
        table.add("error", l2, true);

        assert_eq!(table.dispatch("error", &json!("a")), 1);
        assert_eq!(*first.lock().unwrap(), vec![json!("a")]);
        assert!(second.lock().unwrap().is_empty());

        assert_eq!(table.dispatch("error", &json!("b")), 1);
        assert_eq!(*second.lock().unwrap(), vec![json!("b")]);
        assert_eq!(table.count("error"), 0);
    }

    #[test]
    fn test_one_shot_and_standing_mix() {
        let table = ListenerTable::new();
        let (standing, ls) = recorder();
        let (once, lo) = recorder();
        table.add("messages", ls, false);
        table.add("messages", lo, true);

        assert_eq!(table.dispatch("messages", &json!([])), 2);
        assert_eq!(table.dispatch("messages", &json!([1])), 1);
        assert_eq!(standing.lock().unwrap().len(), 2);
        assert_eq!(once.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_only_touches_one_registration() {
        let table = ListenerTable::new();
        let (_, la) = recorder();
        let (b, lb) = recorder();
        let id_a = table.add("newConversation", la, false);
        table.add("newConversation", lb, false);

        assert!(table.remove("newConversation", id_a));
        assert!(!table.remove("newConversation", id_a));
        assert_eq!(table.dispatch("newConversation", &json!({})), 1);
        assert_eq!(b.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_with_wrong_event_is_noop() {
        let table = ListenerTable::new();
        let (_, l) = recorder();
        let id = table.add("a", l, false);
        assert!(!table.remove("b", id));
        assert_eq!(table.count("a"), 1);
    }

    #[test]
    fn test_handler_may_deregister_during_dispatch() {
        let table = Arc::new(ListenerTable::new());
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let table_ref = Arc::clone(&table);
        let slot_ref = Arc::clone(&slot);
        let id = table.add(
            "tick",
            Arc::new(move |_| {
                if let Some(id) = *slot_ref.lock().unwrap() {
                    table_ref.remove("tick", id);
                }
            }),
            false,
        );
        *slot.lock().unwrap() = Some(id);

        assert_eq!(table.dispatch("tick", &json!(null)), 1);
        assert_eq!(table.count("tick"), 0);
        assert_eq!(table.dispatch("tick", &json!(null)), 0);
    }

    #[test]
    fn test_dispatch_unknown_event() {
        let table = ListenerTable::new();
        assert_eq!(table.dispatch("nothing", &json!(null)), 0);
        assert_eq!(table.total(), 0);
    }
}
