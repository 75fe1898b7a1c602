//! In-memory identity provider for tests/dev.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use rumoerp_core::UserId;
use rumoerp_events::{Emitter, SubscriptionGuard};

use crate::error::ProviderError;
use crate::provider::{AuthChange, IdentityProvider, OtpKind, SignUpOptions, UserUpdate};
use crate::session::{AuthUser, Metadata, Session};

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: AuthUser,
    confirmed: bool,
}

/// In-memory provider.
///
/// - No IO; all state behind mutexes
/// - Emits [`AuthChange`] synchronously from the mutating call
/// - Failure injection (`set_offline`, `set_fail_sign_out`, `set_sign_out_delay`)
///   for exercising the unavailable-provider and optimistic-sign-out paths
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    /// token_hash -> (email, kind)
    pending_tokens: Mutex<HashMap<String, (String, OtpKind)>>,
    /// "Persisted storage" slot; what `get_session` resolves.
    session: Mutex<Option<Session>>,
    changes: Emitter<AuthChange>,
    offline: AtomicBool,
    fail_sign_out: AtomicBool,
    sign_out_delay: Mutex<Option<Duration>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a confirmed account (skips the email-confirmation flow).
    pub fn register_confirmed(&self, email: &str, password: &str, metadata: Metadata) -> UserId {
        let user = AuthUser {
            id: UserId::new(),
            email: email.to_string(),
            email_verified_at: Some(Utc::now()),
            metadata,
        };
        let id = user.id;

        self.lock_accounts().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user,
                confirmed: true,
            },
        );

        id
    }

    /// Seed the persisted-storage slot with a live session for `email`,
    /// as if a previous process had signed in. Returns the session.
    pub fn seed_persisted_session(&self, email: &str) -> Option<Session> {
        let session = {
            let accounts = self.lock_accounts();
            issue_session(&accounts.get(email)?.user)
        };

        *self.lock_session() = Some(session.clone());
        Some(session)
    }

    /// Pending confirmation/recovery token for `email`, if any.
    pub fn pending_token_for(&self, email: &str) -> Option<String> {
        self.pending_tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|(_, (e, _))| e == email)
            .map(|(token, _)| token.clone())
    }

    /// Simulate an unreachable provider for all subsequent calls.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make the next `sign_out` calls fail after any configured delay.
    pub fn set_fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    /// Delay `sign_out` responses (slow-provider simulation).
    pub fn set_sign_out_delay(&self, delay: Duration) {
        *self
            .sign_out_delay
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(delay);
    }

    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_online(&self) -> Result<(), ProviderError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("provider offline".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            pending_tokens: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            changes: Emitter::new(),
            offline: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
            sign_out_delay: Mutex::new(None),
        }
    }
}

fn issue_session(user: &AuthUser) -> Session {
    Session {
        access_token: format!("at-{}", Uuid::now_v7().simple()),
        refresh_token: format!("rt-{}", Uuid::now_v7().simple()),
        expires_at: Utc::now() + chrono::Duration::hours(1),
        user: user.clone(),
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        self.ensure_online()?;

        let session = {
            let accounts = self.lock_accounts();
            let account = accounts
                .get(email)
                .ok_or(ProviderError::InvalidCredentials)?;

            if account.password != password {
                return Err(ProviderError::InvalidCredentials);
            }
            if !account.confirmed {
                return Err(ProviderError::Rejected("e-mail não confirmado".to_string()));
            }

            issue_session(&account.user)
        };

        *self.lock_session() = Some(session.clone());
        // Change notification fires before the call resolves.
        self.changes.emit(&AuthChange::SignedIn(session.clone()));

        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> Result<(), ProviderError> {
        self.ensure_online()?;

        let mut accounts = self.lock_accounts();
        if accounts.contains_key(email) {
            return Err(ProviderError::Rejected("e-mail já cadastrado".to_string()));
        }

        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: AuthUser {
                    id: UserId::new(),
                    email: email.to_string(),
                    email_verified_at: None,
                    metadata: options.data,
                },
                confirmed: false,
            },
        );
        drop(accounts);

        let token = format!("confirm-{}", Uuid::now_v7().simple());
        self.pending_tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(token, (email.to_string(), OtpKind::Signup));

        // redirect_to is where the confirmation email would land the user;
        // nothing to do with it in-memory.
        let _ = options.redirect_to;

        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let delay = *self
            .sign_out_delay
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.ensure_online()?;
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable(
                "sign-out rejected".to_string(),
            ));
        }

        *self.lock_session() = None;
        self.changes.emit(&AuthChange::SignedOut);

        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, ProviderError> {
        self.ensure_online()?;
        Ok(self.lock_session().clone())
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        _redirect_to: &str,
    ) -> Result<(), ProviderError> {
        self.ensure_online()?;

        // No user enumeration: unknown emails succeed silently.
        if self.lock_accounts().contains_key(email) {
            let token = format!("recover-{}", Uuid::now_v7().simple());
            self.pending_tokens
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .insert(token, (email.to_string(), OtpKind::Recovery));
        }

        Ok(())
    }

    async fn update_user(&self, update: UserUpdate) -> Result<(), ProviderError> {
        self.ensure_online()?;

        let email = {
            let session = self.lock_session();
            session
                .as_ref()
                .map(|s| s.user.email.clone())
                .ok_or_else(|| ProviderError::Rejected("não autenticado".to_string()))?
        };

        let mut accounts = self.lock_accounts();
        let account = accounts
            .get_mut(&email)
            .ok_or_else(|| ProviderError::Rejected("conta não encontrada".to_string()))?;

        if let Some(password) = update.password {
            account.password = password;
        }
        if let Some(data) = update.data {
            account.user.metadata.extend(data);
        }

        Ok(())
    }

    async fn verify_otp(&self, token_hash: &str, kind: OtpKind) -> Result<Session, ProviderError> {
        self.ensure_online()?;

        let email = {
            let mut tokens = self
                .pending_tokens
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            match tokens.get(token_hash) {
                Some((email, stored_kind)) if *stored_kind == kind => {
                    let email = email.clone();
                    tokens.remove(token_hash);
                    email
                }
                _ => {
                    return Err(ProviderError::Rejected(
                        "token inválido ou expirado".to_string(),
                    ));
                }
            }
        };

        let session = {
            let mut accounts = self.lock_accounts();
            let account = accounts
                .get_mut(&email)
                .ok_or_else(|| ProviderError::Rejected("conta não encontrada".to_string()))?;

            account.confirmed = true;
            if account.user.email_verified_at.is_none() {
                account.user.email_verified_at = Some(Utc::now());
            }

            issue_session(&account.user)
        };

        *self.lock_session() = Some(session.clone());
        self.changes.emit(&AuthChange::SignedIn(session.clone()));

        Ok(session)
    }

    fn on_auth_change(&self, listener: Box<dyn FnMut(&AuthChange) + Send>) -> SubscriptionGuard {
        self.changes.subscribe(listener)
    }
}
