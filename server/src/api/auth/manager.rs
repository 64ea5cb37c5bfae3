//! Authentication manager

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::jwt::{JwtError, SessionClaims, create_session_token, validate_session_token};
use crate::core::constants::{
    ADMIN_SUBJECT, AUTH_METHOD_BOOTSTRAP, AUTH_METHOD_DISABLED, BOOTSTRAP_TOKEN_BYTES,
};
use crate::core::{AuthConfig, SecretManager};
use crate::utils::crypto;

/// Token exchange failure
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Invalid bootstrap token")]
    InvalidToken,
    #[error(transparent)]
    Signing(#[from] JwtError),
}

/// A freshly issued admin session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Holds the signing key and bootstrap token for the admin surface
#[derive(Debug)]
pub struct AuthManager {
    signing_key: Vec<u8>,
    bootstrap_token: String,
    enabled: bool,
    session_ttl_hours: u32,
}

impl AuthManager {
    /// Initialize the authentication manager
    pub async fn init(secrets: &SecretManager, config: &AuthConfig) -> Result<Self> {
        let signing_key = secrets.get_jwt_signing_key().await?;
        let bootstrap_token = match &config.bootstrap_token {
            Some(token) => {
                tracing::debug!("Using configured bootstrap token");
                token.clone()
            }
            None => {
                tracing::debug!("Bootstrap token generated");
                crypto::generate_token(BOOTSTRAP_TOKEN_BYTES)
            }
        };

        if config.enabled {
            tracing::debug!("Authentication enabled");
        } else {
            tracing::warn!("Authentication DISABLED");
        }

        Ok(Self::new(
            signing_key,
            bootstrap_token,
            config.enabled,
            config.session_ttl_hours,
        ))
    }

    pub fn new(
        signing_key: Vec<u8>,
        bootstrap_token: String,
        enabled: bool,
        session_ttl_hours: u32,
    ) -> Self {
        Self {
            signing_key,
            bootstrap_token,
            enabled,
            session_ttl_hours,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn bootstrap_token(&self) -> &str {
        &self.bootstrap_token
    }

    /// Exchange the bootstrap token for a signed admin session
    pub fn exchange_token(&self, token: &str) -> Result<IssuedSession, ExchangeError> {
        let auth_method = if !self.enabled {
            AUTH_METHOD_DISABLED
        } else if crypto::constant_time_eq(&self.bootstrap_token, token) {
            AUTH_METHOD_BOOTSTRAP
        } else {
            return Err(ExchangeError::InvalidToken);
        };

        let claims = SessionClaims::new(ADMIN_SUBJECT, auth_method, self.session_ttl_hours);
        let token = create_session_token(&self.signing_key, &claims)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::Invalid("expiry out of range".to_string()))?;
        Ok(IssuedSession { token, expires_at })
    }

    /// Validate a JWT session token
    pub fn validate_session(&self, jwt: &str) -> Result<SessionClaims, JwtError> {
        validate_session_token(jwt, &self.signing_key)
    }
}
