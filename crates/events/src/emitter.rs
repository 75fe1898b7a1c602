//! Callback fan-out for discrete events (no replay).

use std::sync::{Arc, Mutex};

use crate::subscription::SubscriptionGuard;

type Listener<M> = Box<dyn FnMut(&M) + Send>;

struct Registry<M> {
    next_id: u64,
    listeners: Vec<(u64, Listener<M>)>,
}

/// Typed event emitter.
///
/// - Broadcast semantics: every listener sees every event emitted after it
///   subscribed. No replay of earlier events.
/// - Delivery is synchronous, in subscription order, on the emitting thread.
/// - Listeners run while the registry lock is held and must not call back
///   into the same emitter.
pub struct Emitter<M> {
    registry: Arc<Mutex<Registry<M>>>,
}

impl<M: 'static> Emitter<M> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Deliver `message` to every live listener.
    pub fn emit(&self, message: &M) {
        // A poisoned lock means a listener panicked; recover and keep
        // delivering rather than silencing all future events.
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        for (_, listener) in registry.listeners.iter_mut() {
            listener(message);
        }
    }

    /// Register `listener` for all future events.
    pub fn subscribe(&self, listener: impl FnMut(&M) + Send + 'static) -> SubscriptionGuard {
        let id = {
            let mut registry = self
                .registry
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Box::new(listener)));
            id
        };

        let weak = Arc::downgrade(&self.registry);
        SubscriptionGuard::new(move || {
            if let Some(registry) = weak.upgrade() {
                if let Ok(mut registry) = registry.lock() {
                    registry.listeners.retain(|(lid, _)| *lid != id);
                }
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.listeners.len())
            .unwrap_or(0)
    }
}

impl<M: 'static> Default for Emitter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Emitter<M> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}
