//! `rumoerp-events` — typed change-notification primitives.
//!
//! Two flavors of pub/sub, both callback-based and both requiring explicit
//! subscriber cleanup (dropping the returned guard):
//!
//! - [`Emitter`] — plain fan-out of discrete events, no replay.
//! - [`StateCell`] — latest-value observable: subscribers receive the current
//!   value immediately on subscribe, then every subsequent value.
//!
//! Neither does IO; both are `Send + Sync` and safe to share via `Clone`
//! (handles share the same registry).

pub mod emitter;
pub mod state_cell;
pub mod subscription;

pub use emitter::Emitter;
pub use state_cell::StateCell;
pub use subscription::SubscriptionGuard;
