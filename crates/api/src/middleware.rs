//! Route-guard middleware.
//!
//! The one production guard path: classify the request path, evaluate the
//! pure guard against the current session state, then map the decision onto
//! transport (303 redirects). The admin refinement runs here too, after the
//! guard allows an admin-only path.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use rumoerp_auth::{GateDecision, SessionState};
use rumoerp_routing::{GuardDecision, LANDING_PATH, RouteClass, SessionPresence, classify, evaluate, login_redirect};

use crate::app::AppState;
use crate::app::errors::json_error;

/// Map store state onto the guard's three-valued presence input.
pub fn presence_of(state: &SessionState) -> SessionPresence {
    if state.is_loading {
        SessionPresence::Loading
    } else if state.session.is_some() {
        SessionPresence::Present
    } else {
        SessionPresence::Absent
    }
}

pub async fn route_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let current = state.store.current();

    let decision = evaluate(&path, presence_of(&current));

    if let Some(target) = decision.redirect_target() {
        // Redirects are silent: no notification is compounded onto them.
        return Redirect::to(&target).into_response();
    }

    if decision == GuardDecision::Pending {
        // First session resolution still in flight. Not a redirect: "not yet
        // known" must not be treated as "absent".
        return json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "session_pending",
            "session resolution in progress",
        );
    }

    if classify(&path) == RouteClass::AdminOnly {
        match current.session.as_ref() {
            Some(session) => {
                if state.gate.check_admin(session).await == GateDecision::Deny {
                    return Redirect::to(LANDING_PATH).into_response();
                }
            }
            // Unreachable through the guard (admin-only implies protected),
            // but a missing session on an admin path must never pass.
            None => return Redirect::to(&login_redirect(&path)).into_response(),
        }
    }

    next.run(req).await
}
