//! Session and user model.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rumoerp_core::UserId;

/// Arbitrary, unvalidated key/value bag attached to a user by the identity
/// provider (name, avatar_url, company_name, cnpj, role hints). Not
/// normalized here.
pub type Metadata = HashMap<String, serde_json::Value>;

/// User as reported by the identity provider.
///
/// # Invariants
/// - `id` is stable and unique; it is the identity key.
/// - `email` may be used for display but never for identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Authenticated session.
///
/// Owned exclusively by the auth orchestrator; immutable once issued and
/// replaced wholesale on refresh/login/logout. At most one current session
/// is active client-side at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

/// Last-known session state as published by the [`crate::SessionStore`].
///
/// `is_loading` stays true until the first provider resolution completes.
/// "Not yet known" is a distinct state from "absent": consumers must not
/// collapse the two (that conflation is what causes redirect flicker).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub is_loading: bool,
}

impl SessionState {
    /// Pre-resolution state: nothing known yet.
    pub fn loading() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }

    /// Post-resolution state.
    pub fn resolved(session: Option<Session>) -> Self {
        Self {
            session,
            is_loading: false,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}
