//! Session store — single source of truth for the current session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rumoerp_events::{StateCell, SubscriptionGuard};

use crate::provider::{AuthChange, IdentityProvider};
use crate::session::SessionState;

/// Holds the last-known session/user pair and lets consumers subscribe to
/// changes.
///
/// # Invariants
/// - No other component caches or mutates session state independently; all
///   writes come from the provider change feed or the orchestrator's
///   optimistic sign-out clear.
/// - The very first resolution (asking the provider for a persisted session)
///   happens exactly once per store lifetime.
/// - Subscribers receive states in publish order; a late subscriber gets the
///   latest state only, never a replay.
///
/// Handles are cheap clones sharing the same store.
pub struct SessionStore {
    cell: StateCell<SessionState>,
    resolve_started: Arc<AtomicBool>,
    provider_feed: Arc<Mutex<Option<SubscriptionGuard>>>,
}

impl SessionStore {
    /// New store in the loading state (first resolution pending).
    pub fn new() -> Self {
        Self {
            cell: StateCell::new(SessionState::loading()),
            resolve_started: Arc::new(AtomicBool::new(false)),
            provider_feed: Arc::new(Mutex::new(None)),
        }
    }

    /// Synchronously available cached state.
    pub fn current(&self) -> SessionState {
        self.cell.get()
    }

    /// Subscribe to session changes. The callback runs once immediately with
    /// the current state and again on every future change. Dropping the guard
    /// unsubscribes; a dropped subscriber is never invoked again.
    pub fn subscribe(
        &self,
        on_change: impl FnMut(&SessionState) + Send + 'static,
    ) -> SubscriptionGuard {
        self.cell.subscribe(on_change)
    }

    /// Wire the provider's change feed into the store. The feed guard lives as
    /// long as the store (or until `attach` is called again).
    pub fn attach(&self, provider: &dyn IdentityProvider) {
        let cell = self.cell.clone();
        let guard = provider.on_auth_change(Box::new(move |change| match change {
            AuthChange::SignedIn(session) | AuthChange::TokenRefreshed(session) => {
                cell.publish(SessionState::resolved(Some(session.clone())));
            }
            AuthChange::SignedOut => {
                cell.publish(SessionState::resolved(None));
            }
        }));

        if let Ok(mut feed) = self.provider_feed.lock() {
            *feed = Some(guard);
        }
    }

    /// Perform the first resolution: ask the provider for any persisted
    /// session. Later calls are no-ops.
    ///
    /// Resolution flips `is_loading` to false even when the provider fails;
    /// the failure is logged and the state resolves to no session.
    pub async fn resolve_initial(&self, provider: &dyn IdentityProvider) {
        if self.resolve_started.swap(true, Ordering::SeqCst) {
            return;
        }

        match provider.get_session().await {
            Ok(session) => self.cell.publish(SessionState::resolved(session)),
            Err(error) => {
                tracing::warn!(%error, "initial session resolution failed");
                self.cell.publish(SessionState::resolved(None));
            }
        }
    }

    /// Optimistic local clear for sign-out: the cached user/session is gone
    /// before the provider confirms invalidation. Never rolled back.
    pub(crate) fn clear_local(&self) {
        self.cell.publish(SessionState::resolved(None));
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            resolve_started: Arc::clone(&self.resolve_started),
            provider_feed: Arc::clone(&self.provider_feed),
        }
    }
}
