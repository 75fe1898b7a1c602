use std::sync::Arc;

use rumoerp_api::app::{AppState, build_app};
use rumoerp_api::config::AppConfig;
use rumoerp_auth::{
    AdminGate, AuthOrchestrator, AuthRedirects, FixedDelayBarrier, IdentityProvider,
    InMemoryIdentityProvider, InMemoryProfileLookup, Metadata, Profile, Role, SessionStore,
    TracingNotifier,
};

#[tokio::main]
async fn main() {
    rumoerp_observability::init();

    let config = AppConfig::from_env();

    // TODO: swap the in-memory provider/lookup for the hosted backend client
    // once its HTTP contract is pinned.
    let provider = Arc::new(InMemoryIdentityProvider::new());
    let lookup = Arc::new(InMemoryProfileLookup::new());

    if let (Ok(email), Ok(password)) = (
        std::env::var("DEV_ADMIN_EMAIL"),
        std::env::var("DEV_ADMIN_PASSWORD"),
    ) {
        let user_id = provider.register_confirmed(&email, &password, Metadata::new());
        lookup.insert(Profile {
            user_id,
            role: Role::admin(),
            is_active: true,
        });
        tracing::info!(%email, "seeded dev admin account");
    }

    let store = SessionStore::new();
    let orchestrator = Arc::new(AuthOrchestrator::new(
        provider.clone() as Arc<dyn IdentityProvider>,
        store.clone(),
        Arc::new(TracingNotifier),
        Arc::new(FixedDelayBarrier::new(config.persistence_delay)),
        AuthRedirects::default(),
    ));

    // First session resolution before serving: the guard never sees the
    // loading state on a live server.
    store.resolve_initial(provider.as_ref()).await;

    let state = AppState {
        orchestrator,
        store,
        gate: Arc::new(AdminGate::new(lookup)),
    };

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
