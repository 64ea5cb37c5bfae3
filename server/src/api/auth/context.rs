//! Admin session context
//!
//! `require_auth` validates the bearer token once and stores an
//! `AdminSession` in the request extensions; handlers extract it from there.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};

use super::jwt::SessionClaims;
use super::middleware::AuthError;
use crate::core::constants::{ADMIN_SUBJECT, AUTH_METHOD_DISABLED};

/// Authenticated admin identity for the current request
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub subject: String,
    pub auth_method: String,
    /// `None` when auth is disabled
    pub expires_at: Option<DateTime<Utc>>,
}

impl AdminSession {
    /// Session used for every request when auth is disabled
    pub fn local() -> Self {
        Self {
            subject: ADMIN_SUBJECT.to_string(),
            auth_method: AUTH_METHOD_DISABLED.to_string(),
            expires_at: None,
        }
    }
}

impl From<SessionClaims> for AdminSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            expires_at: claims.expires_at(),
            subject: claims.sub,
            auth_method: claims.auth_method,
        }
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(AuthError::required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extract_missing_session() {
        let (mut parts, _) = Request::new(()).into_parts();
        let err = AdminSession::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_extract_present_session() {
        let (mut parts, _) = Request::new(()).into_parts();
        parts.extensions.insert(AdminSession::local());
        let session = AdminSession::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(session.auth_method, AUTH_METHOD_DISABLED);
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn test_from_claims() {
        let claims = SessionClaims::new(ADMIN_SUBJECT, "bootstrap", 1);
        let exp = claims.exp;
        let session = AdminSession::from(claims);
        assert_eq!(session.subject, ADMIN_SUBJECT);
        assert_eq!(session.expires_at.map(|t| t.timestamp()), Some(exp));
    }
}
