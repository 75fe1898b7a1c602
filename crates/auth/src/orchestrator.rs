//! Auth orchestrator — drives the provider, keeps the store authoritative.

use std::sync::Arc;

use crate::barrier::PersistenceBarrier;
use crate::error::AuthError;
use crate::notify::Notifier;
use crate::provider::{IdentityProvider, OtpKind, SignUpOptions, UserUpdate};
use crate::session::Metadata;
use crate::store::SessionStore;

/// Redirect targets handed to the provider for email-driven flows.
#[derive(Debug, Clone)]
pub struct AuthRedirects {
    /// Landing path after email confirmation.
    pub confirm: String,
    /// Landing path for the password-recovery link.
    pub reset: String,
}

impl Default for AuthRedirects {
    fn default() -> Self {
        Self {
            confirm: "/auth/confirm".to_string(),
            reset: "/auth/reset-password".to_string(),
        }
    }
}

/// Performs auth operations and keeps the [`SessionStore`] authoritative.
///
/// Session updates flow through the provider's change notification, not
/// direct writes — with one deliberate exception: sign-out clears the store
/// optimistically before the provider confirms (see [`Self::sign_out`]).
///
/// Every operation emits exactly one user-facing notification per outcome
/// category and never lets a provider error escape untyped.
pub struct AuthOrchestrator {
    provider: Arc<dyn IdentityProvider>,
    store: SessionStore,
    notifier: Arc<dyn Notifier>,
    barrier: Arc<dyn PersistenceBarrier>,
    redirects: AuthRedirects,
}

impl AuthOrchestrator {
    /// Build the orchestrator and wire the provider change feed into the
    /// store.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: SessionStore,
        notifier: Arc<dyn Notifier>,
        barrier: Arc<dyn PersistenceBarrier>,
        redirects: AuthRedirects,
    ) -> Self {
        store.attach(provider.as_ref());
        Self {
            provider,
            store,
            notifier,
            barrier,
            redirects,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Sign in with email/password.
    ///
    /// On success the store already reflects the new session (the provider
    /// emits the change before the call resolves), and the persistence
    /// barrier has been awaited — callers may redirect immediately.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let result = self.do_sign_in(email, password).await;
        self.report(&result, "Login realizado com sucesso!");
        result
    }

    async fn do_sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        self.provider.sign_in_with_password(email, password).await?;
        self.barrier.session_persisted().await;

        Ok(())
    }

    /// Request account creation. The user is not signed in synchronously;
    /// the provider may require email confirmation first.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Metadata,
    ) -> Result<(), AuthError> {
        let result = self.do_sign_up(email, password, metadata).await;
        self.report(
            &result,
            "Cadastro realizado! Verifique seu e-mail para confirmar a conta.",
        );
        result
    }

    async fn do_sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Metadata,
    ) -> Result<(), AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        self.provider
            .sign_up(
                email,
                password,
                SignUpOptions {
                    data: metadata,
                    redirect_to: Some(self.redirects.confirm.clone()),
                },
            )
            .await?;

        Ok(())
    }

    /// Sign out.
    ///
    /// The store is cleared *before* the provider call is awaited so the UI
    /// never flashes a stale authenticated state. If the provider call then
    /// fails, local state is not rolled back — sign-out is fire-and-forget
    /// from the UI's perspective; the failure is only logged.
    pub async fn sign_out(&self) {
        self.store.clear_local();

        if let Err(error) = self.provider.sign_out().await {
            tracing::warn!(%error, "provider sign-out failed after local clear");
        }

        self.notifier.success("Sessão encerrada.");
    }

    /// Send a password-recovery email.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let result = self.do_reset_password(email).await;
        self.report(&result, "Enviamos um link de recuperação para seu e-mail.");
        result
    }

    async fn do_reset_password(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        self.provider
            .reset_password_for_email(email, &self.redirects.reset)
            .await?;
        Ok(())
    }

    /// Update the authenticated user's password.
    pub async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        let result = self.do_update_password(new_password).await;
        self.report(&result, "Senha atualizada com sucesso!");
        result
    }

    async fn do_update_password(&self, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;
        self.provider
            .update_user(UserUpdate {
                password: Some(new_password.to_string()),
                data: None,
            })
            .await?;
        Ok(())
    }

    /// Update the authenticated user's metadata (profile edits).
    pub async fn update_profile(&self, data: Metadata) -> Result<(), AuthError> {
        let result = async {
            self.provider
                .update_user(UserUpdate {
                    password: None,
                    data: Some(data),
                })
                .await?;
            Ok(())
        }
        .await;
        self.report(&result, "Perfil atualizado com sucesso!");
        result
    }

    /// Verify an email-confirmation or recovery token. On success the
    /// provider issues a session and the store reflects it.
    pub async fn confirm(&self, token_hash: &str, kind: OtpKind) -> Result<(), AuthError> {
        let result = async {
            self.provider.verify_otp(token_hash, kind).await?;
            Ok(())
        }
        .await;
        self.report(&result, "E-mail confirmado com sucesso!");
        result
    }

    fn report(&self, result: &Result<(), AuthError>, success_message: &str) {
        match result {
            Ok(()) => self.notifier.success(success_message),
            Err(error) => self.notifier.error(failure_message(error)),
        }
    }
}

/// One message per outcome category, not per underlying provider error code.
fn failure_message(error: &AuthError) -> &'static str {
    match error {
        AuthError::InvalidCredentials => "E-mail ou senha incorretos.",
        AuthError::ProviderUnavailable(_) => {
            "Não foi possível conectar ao servidor. Tente novamente."
        }
        AuthError::Validation(_) => "Dados inválidos. Verifique os campos informados.",
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::validation("e-mail é obrigatório"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::validation("e-mail inválido"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(AuthError::validation("e-mail inválido"));
    }

    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 6 {
        return Err(AuthError::validation(
            "senha deve ter ao menos 6 caracteres",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::barrier::NoopBarrier;
    use crate::in_memory::InMemoryIdentityProvider;
    use crate::notify::{NotificationKind, RecordingNotifier};

    struct Fixture {
        provider: Arc<InMemoryIdentityProvider>,
        notifier: Arc<RecordingNotifier>,
        orchestrator: Arc<AuthOrchestrator>,
    }

    fn fixture() -> Fixture {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        provider.register_confirmed("ana@empresa.com.br", "segredo1", HashMap::new());

        let notifier = Arc::new(RecordingNotifier::new());
        let orchestrator = Arc::new(AuthOrchestrator::new(
            provider.clone(),
            SessionStore::new(),
            notifier.clone(),
            Arc::new(NoopBarrier),
            AuthRedirects::default(),
        ));

        Fixture {
            provider,
            notifier,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn sign_in_updates_store_before_returning() {
        let fx = fixture();

        fx.orchestrator
            .sign_in("ana@empresa.com.br", "segredo1")
            .await
            .unwrap();

        let state = fx.orchestrator.store().current();
        assert_eq!(
            state.user().map(|u| u.email.as_str()),
            Some("ana@empresa.com.br")
        );
        assert_eq!(fx.notifier.count(NotificationKind::Success), 1);
        assert_eq!(fx.notifier.count(NotificationKind::Error), 0);
    }

    #[tokio::test]
    async fn sign_in_wrong_password_leaves_store_untouched() {
        let fx = fixture();

        let err = fx
            .orchestrator
            .sign_in("ana@empresa.com.br", "errada1")
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(fx.orchestrator.store().current().session.is_none());
        assert_eq!(fx.notifier.count(NotificationKind::Error), 1);
    }

    #[tokio::test]
    async fn malformed_input_is_rejected_before_any_provider_call() {
        let fx = fixture();
        // An offline provider would turn any network attempt into
        // ProviderUnavailable; validation must fire first.
        fx.provider.set_offline(true);

        let err = fx
            .orchestrator
            .sign_in("sem-arroba", "segredo1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = fx
            .orchestrator
            .sign_in("ana@empresa.com.br", "curta")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_maps_to_provider_unavailable() {
        let fx = fixture();
        fx.provider.set_offline(true);

        let err = fx
            .orchestrator
            .sign_in("ana@empresa.com.br", "segredo1")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::ProviderUnavailable(_)));
        assert!(fx.orchestrator.store().current().session.is_none());
    }

    #[tokio::test]
    async fn sign_out_clears_store_before_provider_confirms() {
        let fx = fixture();
        fx.orchestrator
            .sign_in("ana@empresa.com.br", "segredo1")
            .await
            .unwrap();
        fx.provider.set_sign_out_delay(Duration::from_millis(200));

        let orchestrator = fx.orchestrator.clone();
        let task = tokio::spawn(async move { orchestrator.sign_out().await });

        // The provider is still "in flight"; local state must already be gone.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(fx.orchestrator.store().current().session.is_none());

        task.await.unwrap();
    }

    #[tokio::test]
    async fn sign_out_failure_does_not_restore_local_state() {
        let fx = fixture();
        fx.orchestrator
            .sign_in("ana@empresa.com.br", "segredo1")
            .await
            .unwrap();
        fx.provider.set_fail_sign_out(true);

        fx.orchestrator.sign_out().await;

        assert!(fx.orchestrator.store().current().session.is_none());
    }

    #[tokio::test]
    async fn sign_up_does_not_sign_in_until_confirmation() {
        let fx = fixture();

        fx.orchestrator
            .sign_up(
                "novo@empresa.com.br",
                "segredo1",
                HashMap::from([(
                    "companyName".to_string(),
                    serde_json::Value::String("Empresa Ltda".to_string()),
                )]),
            )
            .await
            .unwrap();
        assert!(fx.orchestrator.store().current().session.is_none());

        let token = fx.provider.pending_token_for("novo@empresa.com.br").unwrap();
        fx.orchestrator
            .confirm(&token, OtpKind::Signup)
            .await
            .unwrap();

        assert_eq!(
            fx.orchestrator
                .store()
                .current()
                .user()
                .map(|u| u.email.clone()),
            Some("novo@empresa.com.br".to_string())
        );
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_a_validation_failure() {
        let fx = fixture();

        let err = fx
            .orchestrator
            .sign_up("ana@empresa.com.br", "segredo1", HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn every_operation_emits_exactly_one_notification() {
        let fx = fixture();

        fx.orchestrator
            .sign_in("ana@empresa.com.br", "segredo1")
            .await
            .unwrap();
        assert_eq!(fx.notifier.entries().len(), 1);

        fx.notifier.clear();
        fx.orchestrator
            .reset_password("ana@empresa.com.br")
            .await
            .unwrap();
        assert_eq!(fx.notifier.entries().len(), 1);

        fx.notifier.clear();
        fx.orchestrator.update_password("novosegredo").await.unwrap();
        assert_eq!(fx.notifier.entries().len(), 1);

        fx.notifier.clear();
        fx.orchestrator.sign_out().await;
        assert_eq!(fx.notifier.entries().len(), 1);
    }

    #[test]
    fn email_validation_rules() {
        assert!(validate_email("ana@empresa.com.br").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("sem-arroba").is_err());
        assert!(validate_email("@dominio.com").is_err());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("ana@semponto").is_err());
        assert!(validate_email("ana maria@empresa.com.br").is_err());
    }
}
