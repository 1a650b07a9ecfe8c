//! Bearer token gate for protected routes.
//!
//! Missing, malformed, expired or wrongly signed tokens all end the request with
//! 401 `{"error": "Unauthorized"}`. Accepted requests carry the decoded claims
//! as an [`AuthenticatedUser`] extension.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::{AuthError, JwtClaims};

use super::error::ApiError;
use super::state::AppState;

/// Claims of the caller, available to handlers behind the gate
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub JwtClaims);

impl AuthenticatedUser {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware rejecting requests without a valid bearer token
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verified = match bearer_token(request.headers()) {
        Some(token) => state.verifier.verify(token),
        None => Err(AuthError::MissingToken),
    };

    match verified {
        Ok(claims) => {
            request.extensions_mut().insert(AuthenticatedUser(claims));
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!(path = %request.uri().path(), reason = %e, "rejected bearer token");
            Err(ApiError::Unauthorized)
        }
    }
}
