//! Authentication middleware

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::context::AdminSession;
use super::jwt::JwtError;
use super::manager::AuthManager;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "UNAUTHORIZED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_EXPIRED",
            message: "Session has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "INVALID_TOKEN",
            message: "Invalid session token".to_string(),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Expired => Self::expired(),
            _ => Self::invalid(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Admin authentication middleware
///
/// The only place session expiry is detected. Injects `AdminSession` into
/// request extensions; when auth is disabled every request gets a local session.
pub async fn require_auth(
    State(auth): State<Arc<AuthManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !auth.is_enabled() {
        request.extensions_mut().insert(AdminSession::local());
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers()).ok_or_else(AuthError::required)?;
    let claims = auth.validate_session(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected admin session");
        AuthError::from(e)
    })?;

    request.extensions_mut().insert(AdminSession::from(claims));
    Ok(next.run(request).await)
}
