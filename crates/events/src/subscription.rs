//! Subscription lifetime management.

/// Handle tying a subscription to a scope.
///
/// Dropping the guard detaches the listener: it will never be invoked again,
/// even if a publish is already in flight on another thread (detachment takes
/// the same lock as delivery). This is the stale-closure protection consumers
/// rely on — a component that unsubscribes before an async result lands must
/// not act on that result.
#[must_use = "dropping the guard immediately unsubscribes the listener"]
pub struct SubscriptionGuard {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    pub(crate) fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl core::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubscriptionGuard").finish_non_exhaustive()
    }
}
