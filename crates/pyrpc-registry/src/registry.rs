//! # Listener Registry
//!
//! Concurrent map from [`EventKey`] to an insertion-ordered handler list.

use std::sync::Arc;

use dashmap::DashMap;
use pyrpc_codec::EventKey;
use tracing::debug;

use crate::handler::Handler;

/// Immutable view of one key's handlers at the moment it was taken.
pub type HandlerSnapshot<S> = Arc<Vec<Handler<S>>>;

/// Event-key addressed handler registry.
///
/// `S` is the sender identity handed to every handler.
pub struct ListenerRegistry<S: ?Sized> {
    handlers: DashMap<EventKey, HandlerSnapshot<S>>,
}

impl<S: ?Sized> ListenerRegistry<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Append a handler to `key`'s list, creating the list if absent.
    ///
    /// The same handler may be registered several times; each registration
    /// is invoked.
    pub fn register(&self, key: EventKey, handler: Handler<S>) {
        let count = {
            let mut list = self.handlers.entry(key.clone()).or_default();
            Arc::make_mut(list.value_mut()).push(handler);
            list.len()
        };
        debug!(event_key = %key, handlers = count, "Handler registered");
    }

    /// Remove the first registration of `handler` under `key`.
    ///
    /// Returns `true` if something was removed. A list left empty is pruned.
    pub fn unregister(&self, key: &EventKey, handler: &Handler<S>) -> bool {
        let removed = match self.handlers.get_mut(key) {
            Some(mut list) => match list.iter().position(|h| h == handler) {
                Some(index) => {
                    Arc::make_mut(list.value_mut()).remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };

        if removed {
            self.handlers.remove_if(key, |_, list| list.is_empty());
            debug!(event_key = %key, "Handler unregistered");
        }
        removed
    }

    /// Drop every handler under `key`. Returns how many were dropped.
    pub fn unregister_all(&self, key: &EventKey) -> usize {
        let dropped = self
            .handlers
            .remove(key)
            .map(|(_, list)| list.len())
            .unwrap_or(0);
        if dropped > 0 {
            debug!(event_key = %key, dropped, "All handlers unregistered");
        }
        dropped
    }

    /// Snapshot of `key`'s handlers.
    ///
    /// Later registrations or removals never affect a snapshot already taken.
    pub fn snapshot(&self, key: &EventKey) -> HandlerSnapshot<S> {
        self.handlers
            .get(key)
            .map(|list| Arc::clone(list.value()))
            .unwrap_or_default()
    }

    pub fn has_handlers(&self, key: &EventKey) -> bool {
        self.handlers
            .get(key)
            .map(|list| !list.is_empty())
            .unwrap_or(false)
    }

    pub fn handler_count(&self, key: &EventKey) -> usize {
        self.handlers.get(key).map(|list| list.len()).unwrap_or(0)
    }

    /// Number of keys with at least one handler.
    pub fn registered_event_count(&self) -> usize {
        self.handlers.len()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        let keys = self.handlers.len();
        self.handlers.clear();
        debug!(keys, "Listener registry cleared");
    }
}

impl<S: ?Sized> Default for ListenerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
