//! Role/permission gate for admin-only routes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rumoerp_core::UserId;

use crate::error::LookupError;
use crate::role::Role;
use crate::session::Session;

/// Profile/role record, maintained server-side out of band (created by a
/// trigger on user creation) and read-only from this core's perspective.
///
/// One-to-one (eventually consistent) with the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub role: Role,
    pub is_active: bool,
}

/// Profile lookup keyed by the authenticated user's id.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, LookupError>;
}

/// Outcome of an admin check. Never an error: lookup failures resolve to a
/// deny so the caller always has a safe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Redirect to the authenticated landing path; the redirect is silent.
    Deny,
}

/// Refines admin-only routes with a role check the session alone cannot
/// answer.
pub struct AdminGate {
    lookup: Arc<dyn ProfileLookup>,
}

impl AdminGate {
    pub fn new(lookup: Arc<dyn ProfileLookup>) -> Self {
        Self { lookup }
    }

    /// One async lookup per navigation into an admin-only path; the decision
    /// is not cached across navigations (caching would mask role revocation).
    ///
    /// Allows only an existing, active profile whose role equals the admin
    /// marker. Everything else — including lookup errors — denies
    /// (fail-closed; failing open here would be a privilege escalation).
    pub async fn check_admin(&self, session: &Session) -> GateDecision {
        match self.lookup.find_profile(session.user.id).await {
            Ok(Some(profile)) if profile.is_active && profile.role.is_admin() => {
                GateDecision::Allow
            }
            Ok(_) => GateDecision::Deny,
            Err(error) => {
                tracing::warn!(
                    %error,
                    user_id = %session.user.id,
                    "profile lookup failed; denying admin access"
                );
                GateDecision::Deny
            }
        }
    }
}

/// In-memory profile lookup for tests/dev, with failure injection.
#[derive(Default)]
pub struct InMemoryProfileLookup {
    profiles: Mutex<HashMap<UserId, Profile>>,
    fail: AtomicBool,
}

impl InMemoryProfileLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: Profile) {
        self.profiles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(profile.user_id, profile);
    }

    /// Make subsequent lookups fail (simulated backend outage).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileLookup for InMemoryProfileLookup {
    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, LookupError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LookupError("injected lookup failure".to_string()));
        }

        Ok(self
            .profiles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&user_id)
            .cloned())
    }
}
