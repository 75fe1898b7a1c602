//! Auth error taxonomy.

use thiserror::Error;

/// Failure reported by the identity provider client.
///
/// The provider contract resolves every call to `{data, error}`; this is the
/// typed rendition of the `error` half.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Wrong email/password (or unconfirmed account presented as such).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Provider unreachable or timed out.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Provider rejected the request (e.g. duplicate registration,
    /// expired confirmation token).
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Error surfaced by auth operations at the orchestrator boundary.
///
/// Provider failures are converted here; no provider error type crosses into
/// callers, and nothing panics across the public boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong email/password. Recovered locally (message, no redirect).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Provider unreachable. Session state is left unchanged — an
    /// unreachable provider does not mean logged-out.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Malformed input, rejected before any provider call.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<ProviderError> for AuthError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::InvalidCredentials => Self::InvalidCredentials,
            ProviderError::Unavailable(msg) => Self::ProviderUnavailable(msg),
            ProviderError::Rejected(msg) => Self::Validation(msg),
        }
    }
}

/// Profile/role lookup failure (admin gate).
///
/// Never surfaced to the end user directly; the gate resolves it to a deny
/// and logs it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("profile lookup failed: {0}")]
pub struct LookupError(pub String);
