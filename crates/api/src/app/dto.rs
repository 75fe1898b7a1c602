//! Request/response DTOs.

use serde::{Deserialize, Serialize};

use rumoerp_auth::{AuthUser, Metadata};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Return target preserved by the guard's login redirect.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub token_hash: String,
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub data: Metadata,
}

/// Navigation decision returned to the caller; the client-side router
/// performs the actual navigation.
#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<AuthUser>,
    pub is_loading: bool,
}
