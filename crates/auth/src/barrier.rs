//! Session-persistence barrier.

use std::time::Duration;

use async_trait::async_trait;

/// Signal that the provider's session persistence (cookie / local storage
/// write) has completed.
///
/// After a successful sign-in the caller typically redirects immediately;
/// redirecting before the session write lands produces a logged-out flash on
/// the target page. Platforms that expose an explicit persistence-confirmed
/// callback should implement this trait over it.
#[async_trait]
pub trait PersistenceBarrier: Send + Sync {
    async fn session_persisted(&self);
}

/// Fixed-delay fallback barrier.
///
/// Known workaround for platforms without a persistence-confirmed signal:
/// wait a short fixed interval and assume the write has landed.
pub struct FixedDelayBarrier {
    delay: Duration,
}

impl FixedDelayBarrier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelayBarrier {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl PersistenceBarrier for FixedDelayBarrier {
    async fn session_persisted(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No-op barrier for tests and in-process providers (nothing to persist).
pub struct NoopBarrier;

#[async_trait]
impl PersistenceBarrier for NoopBarrier {
    async fn session_persisted(&self) {}
}
