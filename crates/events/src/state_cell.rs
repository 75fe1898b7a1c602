//! Latest-value observable.

use std::sync::{Arc, Mutex};

use crate::subscription::SubscriptionGuard;

type Listener<S> = Box<dyn FnMut(&S) + Send>;

struct Inner<S> {
    current: S,
    next_id: u64,
    subscribers: Vec<(u64, Listener<S>)>,
}

/// Observable cell holding the latest published value.
///
/// Semantics (deliberately different from [`crate::Emitter`]):
///
/// - `subscribe` invokes the listener **once immediately** with the current
///   value, then again on every future publish.
/// - A late subscriber sees only the latest value, never a replay of earlier
///   ones, and an older value is never delivered after a newer one: the value
///   swap and the fan-out happen under one lock, so deliveries are totally
///   ordered across threads.
/// - Listeners run while the cell lock is held and must not call back into
///   the same cell.
///
/// Handles are cheap clones sharing the same cell.
pub struct StateCell<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S: Clone + Send + 'static> StateCell<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                current: initial,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> S {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .current
            .clone()
    }

    /// Replace the current value and notify every live subscriber.
    pub fn publish(&self, state: S) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let Inner {
            current,
            subscribers,
            ..
        } = &mut *inner;

        *current = state;
        for (_, listener) in subscribers.iter_mut() {
            listener(current);
        }
    }

    /// Register `listener`; it runs once immediately with the current value.
    pub fn subscribe(&self, mut listener: impl FnMut(&S) + Send + 'static) -> SubscriptionGuard {
        let id = {
            let mut inner = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            listener(&inner.current);

            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Box::new(listener)));
            id
        };

        let weak = Arc::downgrade(&self.inner);
        SubscriptionGuard::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut inner) = inner.lock() {
                    inner.subscribers.retain(|(sid, _)| *sid != id);
                }
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.subscribers.len())
            .unwrap_or(0)
    }
}

impl<S> Clone for StateCell<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
