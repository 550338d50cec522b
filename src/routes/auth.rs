//! Authentication route handlers
//!
//! Provides the login endpoint that exchanges credentials for a token.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::authenticate;
use crate::error::ApiResult;
use crate::state::SharedState;

// ============================================
// Request/Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Scope names requested for the issued token
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// ============================================
// Route Handlers
// ============================================

/// POST /token
///
/// Authenticate with username and password, receive a bearer token
/// carrying the requested scopes.
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let principal = authenticate(state.credentials.as_ref(), &req.username, &req.password)?;

    // Scopes are issued as requested; the role guard on the admin surface
    // re-checks the stored role on every request
    let access_token = state.tokens.issue(&principal.username, req.scopes)?;

    info!(user = %principal.username, "token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
