//! `rumoerp-routing` — route classification and the route-guard state machine.
//!
//! Pure decision logic: no IO, no async, no framework types. The api crate
//! maps [`GuardDecision`] onto actual redirects; keeping the decision pure is
//! what makes the guard unit-testable without a browser, and guarantees there
//! is exactly one production guard code path (the table below is the single
//! source of route classes).

pub mod classify;
pub mod guard;

pub use classify::{LANDING_PATH, LOGIN_PATH, NEXT_PARAM, RouteClass, classify};
pub use guard::{GuardDecision, SessionPresence, evaluate, login_redirect};
