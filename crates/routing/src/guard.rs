//! Route guard — allow/redirect decisions per navigation.

use serde::Serialize;

use crate::classify::{LANDING_PATH, LOGIN_PATH, NEXT_PARAM, RouteClass, classify};

/// What the guard knows about the session at evaluation time.
///
/// `Loading` is a distinct third state: "not yet known" must never be
/// collapsed into "absent" (that collapse is the classic redirect-flicker
/// bug).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPresence {
    Loading,
    Absent,
    Present,
}

/// Pure guard decision; the caller (router layer) performs any navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    /// Session resolution still pending on a route that needs one: wait for
    /// resolution, do not redirect yet.
    Pending,
    /// Send to the login page, preserving the requested path.
    RedirectToLogin { next: String },
    /// Send to the authenticated landing path.
    RedirectToApp,
}

impl GuardDecision {
    /// Concrete redirect target, if the decision is a redirect.
    pub fn redirect_target(&self) -> Option<String> {
        match self {
            GuardDecision::Allow | GuardDecision::Pending => None,
            GuardDecision::RedirectToLogin { next } => Some(login_redirect(next)),
            GuardDecision::RedirectToApp => Some(LANDING_PATH.to_string()),
        }
    }
}

/// Login URL carrying the original path as the return target.
pub fn login_redirect(next: &str) -> String {
    format!("{LOGIN_PATH}?{NEXT_PARAM}={next}")
}

/// Evaluate the guard for one navigation.
///
/// Runs on every navigation event and on every session change (the session
/// can become available after the route rendered). Rules in order, first
/// match wins:
///
/// 1. Exempt technical path → allow, no further checks.
/// 2. Session absent + protected/admin path → redirect to login with `next`.
/// 3. Session present + auth-only path → redirect to the landing path.
/// 4. Otherwise → allow.
///
/// Pure and idempotent: same inputs, same decision, no side effects — so
/// re-evaluating the target of a redirect cannot loop.
pub fn evaluate(path: &str, presence: SessionPresence) -> GuardDecision {
    match classify(path) {
        RouteClass::Exempt => GuardDecision::Allow,
        RouteClass::Protected | RouteClass::AdminOnly => match presence {
            SessionPresence::Loading => GuardDecision::Pending,
            SessionPresence::Absent => GuardDecision::RedirectToLogin {
                next: path.to_string(),
            },
            SessionPresence::Present => GuardDecision::Allow,
        },
        RouteClass::AuthOnly => match presence {
            SessionPresence::Present => GuardDecision::RedirectToApp,
            SessionPresence::Loading | SessionPresence::Absent => GuardDecision::Allow,
        },
        RouteClass::Public => GuardDecision::Allow,
    }
}
