//! Auth endpoints.
//!
//! Handlers call the orchestrator and return navigation *decisions*
//! (`redirect_to`) instead of issuing redirects themselves; the client-side
//! router owns navigation.

use axum::{Json, extract::State, response::IntoResponse, response::Response};

use rumoerp_auth::OtpKind;
use rumoerp_routing::{LANDING_PATH, LOGIN_PATH};

use crate::app::AppState;
use crate::app::dto::{
    ConfirmRequest, ForgotPasswordRequest, LoginRequest, RedirectResponse, RegisterRequest,
    ResetPasswordRequest, SessionResponse, UpdateProfileRequest,
};
use crate::app::errors::{auth_error_to_response, json_error};

/// Only same-origin absolute paths may be used as a return target;
/// anything else falls back to the landing path (open-redirect protection).
fn sanitize_next(next: Option<String>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") => n,
        _ => LANDING_PATH.to_string(),
    }
}

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.orchestrator.sign_in(&req.email, &req.password).await {
        Ok(()) => Json(RedirectResponse {
            redirect_to: Some(sanitize_next(req.next)),
        })
        .into_response(),
        Err(err) => auth_error_to_response(err),
    }
}

pub async fn register(State(state): State<AppState>, Json(req): Json<RegisterRequest>) -> Response {
    match state
        .orchestrator
        .sign_up(&req.email, &req.password, req.metadata)
        .await
    {
        // No session yet; the user confirms by email before logging in.
        Ok(()) => Json(RedirectResponse { redirect_to: None }).into_response(),
        Err(err) => auth_error_to_response(err),
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    state.orchestrator.sign_out().await;
    Json(RedirectResponse {
        redirect_to: Some(LOGIN_PATH.to_string()),
    })
    .into_response()
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Response {
    match state.orchestrator.reset_password(&req.email).await {
        Ok(()) => Json(RedirectResponse { redirect_to: None }).into_response(),
        Err(err) => auth_error_to_response(err),
    }
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Response {
    match state.orchestrator.update_password(&req.password).await {
        Ok(()) => Json(RedirectResponse {
            redirect_to: Some(LANDING_PATH.to_string()),
        })
        .into_response(),
        Err(err) => auth_error_to_response(err),
    }
}

pub async fn confirm(State(state): State<AppState>, Json(req): Json<ConfirmRequest>) -> Response {
    let kind = match req.kind.as_str() {
        "signup" => OtpKind::Signup,
        "recovery" => OtpKind::Recovery,
        other => {
            return json_error(
                axum::http::StatusCode::BAD_REQUEST,
                "invalid_otp_kind",
                format!("kind must be signup or recovery, got {other}"),
            );
        }
    };

    match state.orchestrator.confirm(&req.token_hash, kind).await {
        Ok(()) => Json(RedirectResponse {
            redirect_to: Some(LANDING_PATH.to_string()),
        })
        .into_response(),
        Err(err) => auth_error_to_response(err),
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Response {
    match state.orchestrator.update_profile(req.data).await {
        Ok(()) => Json(RedirectResponse { redirect_to: None }).into_response(),
        Err(err) => auth_error_to_response(err),
    }
}

/// Current cached session state (the SPA's `getCurrent`).
pub async fn session(State(state): State<AppState>) -> Response {
    let current = state.store.current();
    Json(SessionResponse {
        user: current.user().cloned(),
        is_loading: current.is_loading,
    })
    .into_response()
}
