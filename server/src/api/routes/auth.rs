//! Authentication API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::{AuthError, AuthManager, ExchangeError, bearer_token};
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExchangeRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub auth_enabled: bool,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Create auth routes
pub fn routes(auth_manager: Arc<AuthManager>) -> Router {
    Router::new()
        .route("/exchange", post(exchange_token))
        .route("/status", get(auth_status))
        .with_state(auth_manager)
}

/// Exchange the bootstrap token for an admin session JWT
#[utoipa::path(
    post,
    path = "/api/v1/auth/exchange",
    tag = "auth",
    request_body = ExchangeRequest,
    responses(
        (status = 200, description = "Token exchanged successfully", body = ExchangeResponse),
        (status = 401, description = "Invalid bootstrap token")
    )
)]
pub async fn exchange_token(
    State(auth): State<Arc<AuthManager>>,
    ValidatedJson(request): ValidatedJson<ExchangeRequest>,
) -> Response {
    match auth.exchange_token(&request.token) {
        Ok(issued) => {
            tracing::info!(expires_at = %issued.expires_at, "Admin session issued");
            (
                StatusCode::OK,
                Json(ExchangeResponse {
                    token: issued.token,
                    expires_at: issued.expires_at,
                }),
            )
                .into_response()
        }
        Err(ExchangeError::InvalidToken) => {
            tracing::warn!("Rejected bootstrap token exchange");
            AuthError::invalid().into_response()
        }
        Err(ExchangeError::Signing(e)) => {
            tracing::error!(error = %e, "Failed to sign session token");
            ApiError::internal("Failed to create session").into_response()
        }
    }
}

/// Report whether the presented bearer token is a valid admin session
#[utoipa::path(
    get,
    path = "/api/v1/auth/status",
    tag = "auth",
    responses(
        (status = 200, description = "Authentication status", body = AuthStatusResponse)
    )
)]
pub async fn auth_status(
    State(auth): State<Arc<AuthManager>>,
    headers: HeaderMap,
) -> Json<AuthStatusResponse> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let unauthenticated = AuthStatusResponse {
        authenticated: false,
        auth_enabled: auth.is_enabled(),
        version: VERSION,
        auth_method: None,
        expires_at: None,
    };

    if !auth.is_enabled() {
        return Json(AuthStatusResponse {
            authenticated: true,
            auth_method: Some(crate::core::constants::AUTH_METHOD_DISABLED.to_string()),
            ..unauthenticated
        });
    }

    let Some(token) = bearer_token(&headers) else {
        return Json(unauthenticated);
    };

    match auth.validate_session(token) {
        Ok(claims) => Json(AuthStatusResponse {
            authenticated: true,
            expires_at: claims.expires_at(),
            auth_method: Some(claims.auth_method),
            ..unauthenticated
        }),
        Err(_) => Json(unauthenticated),
    }
}
