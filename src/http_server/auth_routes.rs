//! Auth HTTP Routes
//!
//! `POST /api/login` exchanges an email/password pair for a bearer token. The
//! pair may be sent as JSON or as a urlencoded form.

use axum::{
    body::Bytes, extract::rejection::BytesRejection, extract::State, http::HeaderMap,
    routing::post, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::body::parse_fields;
use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Auth routes (unguarded)
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login_handler))
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// ==================
// Handlers
// ==================

impl LoginRequest {
    /// Decode a JSON or form body. Anything unusable yields empty credentials.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Self {
        parse_fields(headers, body)
            .ok()
            .and_then(|fields| serde_json::from_value(Value::Object(fields)).ok())
            .unwrap_or_default()
    }
}

/// Login handler. Any unusable body is treated as wrong credentials.
async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { email, password } = LoginRequest::from_body(&headers, &body?);

    // Argon2 verification is CPU-bound
    let credentials = state.credentials.clone();
    let attempted = email.clone();
    let outcome = tokio::task::spawn_blocking(move || credentials.authenticate(&email, &password))
        .await
        .map_err(|e| ApiError::Internal(format!("credential check aborted: {}", e)))?;

    let email = match outcome {
        Ok(email) => email,
        Err(e) => {
            warn!(email = %attempted, "login refused");
            return Err(e.into());
        }
    };

    let token = state.tokens.generate_access_token(&email)?;
    info!(%email, "login succeeded");

    Ok(Json(LoginResponse { token }))
}
