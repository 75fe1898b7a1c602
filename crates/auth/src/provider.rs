//! Identity provider client contract.

use async_trait::async_trait;

use rumoerp_events::SubscriptionGuard;

use crate::error::ProviderError;
use crate::session::{Metadata, Session};

/// Session change pushed by the provider (typed `onAuthStateChange`).
#[derive(Debug, Clone, PartialEq)]
pub enum AuthChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Options for account creation.
#[derive(Debug, Clone, Default)]
pub struct SignUpOptions {
    /// Initial user metadata (name, company_name, cnpj, ...).
    pub data: Metadata,
    /// Where the provider should land the user after email confirmation.
    pub redirect_to: Option<String>,
}

/// Partial update of the authenticated user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub data: Option<Metadata>,
}

/// Kind of one-time-token being verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpKind {
    Signup,
    Recovery,
}

/// Hosted identity provider, consumed as a black box.
///
/// Every call is a suspension point. Implementations must emit the matching
/// [`AuthChange`] *synchronously, before the call resolves* for operations
/// that change the session (sign-in, OTP verification, sign-out) — the
/// session store relies on this ordering to be up to date when an operation
/// returns.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError>;

    /// Request account creation. Does not sign the user in; the provider may
    /// require email confirmation first.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> Result<(), ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Any existing session from persisted storage.
    async fn get_session(&self) -> Result<Option<Session>, ProviderError>;

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), ProviderError>;

    async fn update_user(&self, update: UserUpdate) -> Result<(), ProviderError>;

    /// Verify a confirmation/recovery token; resolves to the new session.
    async fn verify_otp(&self, token_hash: &str, kind: OtpKind) -> Result<Session, ProviderError>;

    /// Subscribe to session changes. The listener runs synchronously when the
    /// provider emits; dropping the guard unsubscribes.
    fn on_auth_change(&self, listener: Box<dyn FnMut(&AuthChange) + Send>) -> SubscriptionGuard;
}
