use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::redirect::Policy;
use serde_json::json;

use rumoerp_api::app::{AppState, build_app};
use rumoerp_auth::{
    AdminGate, AuthOrchestrator, AuthRedirects, IdentityProvider, InMemoryIdentityProvider,
    InMemoryProfileLookup, Metadata, NoopBarrier, NotificationKind, Profile, RecordingNotifier,
    Role, SessionStore,
};
use rumoerp_core::UserId;

struct TestServer {
    base_url: String,
    provider: Arc<InMemoryIdentityProvider>,
    lookup: Arc<InMemoryProfileLookup>,
    notifier: Arc<RecordingNotifier>,
    store: SessionStore,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same wiring as prod, but in-memory collaborators, a no-op
        // persistence barrier, and an ephemeral port.
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let lookup = Arc::new(InMemoryProfileLookup::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let store = SessionStore::new();

        let orchestrator = Arc::new(AuthOrchestrator::new(
            provider.clone() as Arc<dyn IdentityProvider>,
            store.clone(),
            notifier.clone(),
            Arc::new(NoopBarrier),
            AuthRedirects::default(),
        ));

        store.resolve_initial(provider.as_ref()).await;

        let state = AppState {
            orchestrator,
            store: store.clone(),
            gate: Arc::new(AdminGate::new(lookup.clone())),
        };
        let app = build_app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            provider,
            lookup,
            notifier,
            store,
            handle,
        }
    }

    fn seed_user(&self, email: &str, password: &str) -> UserId {
        self.provider
            .register_confirmed(email, password, Metadata::new())
    }

    fn seed_profile(&self, user_id: UserId, role: Role, is_active: bool) {
        self.lookup.insert(Profile {
            user_id,
            role,
            is_active,
        });
    }

    async fn login(&self, client: &reqwest::Client, email: &str, password: &str) {
        let res = client
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn client() -> reqwest::Client {
    // No redirect following: the Location headers are what's under test.
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(reqwest::header::LOCATION)
        .expect("expected a Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn protected_path_without_session_redirects_to_login_with_next() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .get(format!("{}/clientes", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/auth/login?next=/clientes");
}

#[tokio::test]
async fn guard_is_idempotent_across_repeated_requests() {
    let srv = TestServer::spawn().await;
    let client = client();

    for _ in 0..2 {
        let res = client
            .get(format!("{}/contas-pagar", srv.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/auth/login?next=/contas-pagar");
    }
}

#[tokio::test]
async fn auth_only_path_with_session_redirects_to_landing() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.seed_user("ana@empresa.com.br", "segredo1");
    srv.login(&client, "ana@empresa.com.br", "segredo1").await;

    let res = client
        .get(format!("{}/auth/login", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn login_reflects_user_in_store_with_one_success_notification() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.seed_user("ana@empresa.com.br", "segredo1");

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({
            "email": "ana@empresa.com.br",
            "password": "segredo1",
            "next": "/clientes"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["redirect_to"], "/clientes");

    assert_eq!(
        srv.store.current().user().map(|u| u.email.clone()),
        Some("ana@empresa.com.br".to_string())
    );
    assert_eq!(srv.notifier.count(NotificationKind::Success), 1);

    // And the protected section is now reachable.
    let res = client
        .get(format!("{}/clientes", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.seed_user("ana@empresa.com.br", "segredo1");

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "ana@empresa.com.br", "password": "errada1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");
    assert!(srv.store.current().session.is_none());
}

#[tokio::test]
async fn login_with_malformed_email_is_rejected_before_the_provider() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.provider.set_offline(true);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "sem-arroba", "password": "segredo1" }))
        .send()
        .await
        .unwrap();

    // 400, not 502: validation fires before any provider call.
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn external_next_targets_fall_back_to_landing() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.seed_user("ana@empresa.com.br", "segredo1");

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({
            "email": "ana@empresa.com.br",
            "password": "segredo1",
            "next": "https://evil.example/phish"
        }))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["redirect_to"], "/");
}

#[tokio::test]
async fn admin_route_allows_active_admin_profile() {
    let srv = TestServer::spawn().await;
    let client = client();
    let user_id = srv.seed_user("ana@empresa.com.br", "segredo1");
    srv.seed_profile(user_id, Role::admin(), true);
    srv.login(&client, "ana@empresa.com.br", "segredo1").await;

    let res = client
        .get(format!("{}/configuracoes", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_route_redirects_non_admin_to_landing() {
    let srv = TestServer::spawn().await;
    let client = client();
    let user_id = srv.seed_user("bia@empresa.com.br", "segredo1");
    srv.seed_profile(user_id, Role::new("user"), true);
    srv.login(&client, "bia@empresa.com.br", "segredo1").await;

    let res = client
        .get(format!("{}/configuracoes", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn admin_gate_fails_closed_when_lookup_is_down() {
    let srv = TestServer::spawn().await;
    let client = client();
    let user_id = srv.seed_user("ana@empresa.com.br", "segredo1");
    srv.seed_profile(user_id, Role::admin(), true);
    srv.login(&client, "ana@empresa.com.br", "segredo1").await;

    srv.lookup.set_fail(true);

    let res = client
        .get(format!("{}/configuracoes", srv.base_url))
        .send()
        .await
        .unwrap();

    // Even a real admin is denied while the lookup is failing.
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn sign_out_clears_session_before_the_provider_confirms() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.seed_user("ana@empresa.com.br", "segredo1");
    srv.login(&client, "ana@empresa.com.br", "segredo1").await;

    // Slow, failing provider: the optimistic clear must not wait for it.
    srv.provider.set_sign_out_delay(Duration::from_millis(150));
    srv.provider.set_fail_sign_out(true);

    let logout_client = client.clone();
    let base_url = srv.base_url.clone();
    let logout = tokio::spawn(async move {
        logout_client
            .post(format!("{base_url}/auth/logout"))
            .send()
            .await
            .unwrap()
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(srv.store.current().session.is_none());

    let res = logout.await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Provider failure is not rolled back: still signed out.
    let res = client
        .get(format!("{}/clientes", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn register_confirm_flow_signs_the_user_in() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "email": "novo@empresa.com.br",
            "password": "segredo1",
            "metadata": { "companyName": "Empresa Ltda", "cnpj": "12.345.678/0001-00" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Not signed in until the email is confirmed.
    assert!(srv.store.current().session.is_none());

    let token = srv
        .provider
        .pending_token_for("novo@empresa.com.br")
        .expect("sign-up should leave a pending confirmation token");

    let res = client
        .post(format!("{}/auth/confirm", srv.base_url))
        .json(&json!({ "token_hash": token, "kind": "signup" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["redirect_to"], "/");
    assert_eq!(
        srv.store.current().user().map(|u| u.email.clone()),
        Some("novo@empresa.com.br".to_string())
    );
}

#[tokio::test]
async fn session_endpoint_reports_cached_state() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.seed_user("ana@empresa.com.br", "segredo1");

    let res = client
        .get(format!("{}/auth/session", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["user"].is_null());
    assert_eq!(body["is_loading"], false);

    srv.login(&client, "ana@empresa.com.br", "segredo1").await;

    let res = client
        .get(format!("{}/auth/session", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email"], "ana@empresa.com.br");
}

#[tokio::test]
async fn technical_paths_skip_all_checks() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn unknown_public_paths_are_not_found_not_redirected() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .get(format!("{}/sobre", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_update_requires_a_session() {
    let srv = TestServer::spawn().await;
    let client = client();
    srv.seed_user("ana@empresa.com.br", "segredo1");

    // Without a session, /perfil is guarded like any protected path.
    let res = client
        .post(format!("{}/perfil", srv.base_url))
        .json(&json!({ "data": { "name": "Ana" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    srv.login(&client, "ana@empresa.com.br", "segredo1").await;

    let res = client
        .post(format!("{}/perfil", srv.base_url))
        .json(&json!({ "data": { "name": "Ana" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
