//! `rumoerp-auth` — session lifecycle and authorization boundary.
//!
//! This crate owns the client-side auth coordination: the session store
//! (single source of truth for the current session), the orchestrator that
//! drives the external identity provider, and the admin gate that refines
//! route access with a profile lookup. It is intentionally decoupled from
//! HTTP; the api crate maps decisions onto transport.

pub mod barrier;
pub mod error;
pub mod gate;
pub mod in_memory;
pub mod notify;
pub mod orchestrator;
pub mod provider;
pub mod role;
pub mod session;
pub mod store;

pub use barrier::{FixedDelayBarrier, NoopBarrier, PersistenceBarrier};
pub use error::{AuthError, LookupError, ProviderError};
pub use gate::{AdminGate, GateDecision, InMemoryProfileLookup, Profile, ProfileLookup};
pub use in_memory::InMemoryIdentityProvider;
pub use notify::{Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier};
pub use orchestrator::{AuthOrchestrator, AuthRedirects};
pub use provider::{AuthChange, IdentityProvider, OtpKind, SignUpOptions, UserUpdate};
pub use role::Role;
pub use session::{AuthUser, Metadata, Session, SessionState};
pub use store::SessionStore;
