//! Application wiring: state, router, middleware layering.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use rumoerp_auth::{AdminGate, AuthOrchestrator, SessionStore};

use crate::middleware::route_guard;

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared handler state.
///
/// The store handle is the same one the orchestrator writes through — there
/// is exactly one source of truth for session state per process.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AuthOrchestrator>,
    pub store: SessionStore,
    pub gate: Arc<AdminGate>,
}

/// Build the router. Every route sits behind the guard layer; page rendering
/// is a fallback keyed off the same classification table the guard uses.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::pages::health))
        .route("/auth/login", post(routes::auth::login).get(routes::pages::page))
        .route(
            "/auth/register",
            post(routes::auth::register).get(routes::pages::page),
        )
        .route(
            "/auth/forgot-password",
            post(routes::auth::forgot_password).get(routes::pages::page),
        )
        .route(
            "/auth/reset-password",
            post(routes::auth::reset_password).get(routes::pages::page),
        )
        .route("/auth/confirm", post(routes::auth::confirm))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/session", get(routes::auth::session))
        .route(
            "/perfil",
            post(routes::auth::update_profile).get(routes::pages::page),
        )
        .fallback(routes::pages::page)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(state.clone(), route_guard)),
        )
        .with_state(state)
}
