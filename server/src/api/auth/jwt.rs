//! JWT session token handling

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::constants::JWT_ISSUER;

/// JWT validation error
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Session token has expired")]
    Expired,
    #[error("Invalid session token signature")]
    InvalidSignature,
    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// JWT claims for admin session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub iss: String,
    pub auth_method: String,
}

impl SessionClaims {
    pub fn new(subject: &str, auth_method: &str, ttl_hours: u32) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours as i64);

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            iss: JWT_ISSUER.to_string(),
            auth_method: auth_method.to_string(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Sign claims into a compact HS256 token
pub fn create_session_token(
    signing_key: &[u8],
    claims: &SessionClaims,
) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| JwtError::Invalid(format!("failed to sign: {}", e)))
}

/// Validate and decode a session token (signature, expiry, issuer)
pub fn validate_session_token(token: &str, signing_key: &[u8]) -> Result<SessionClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_issuer(&[JWT_ISSUER]);

    let token_data =
        decode::<SessionClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}
