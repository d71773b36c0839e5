//! Configuration for the token service

use std::str::FromStr;

use af_shared::config::{JwtConfig, DEFAULT_JWT_SECRET_BASE64, DEFAULT_TOKEN_TTL_SECONDS};
use jsonwebtoken::Algorithm;

use crate::errors::{DomainError, TokenError};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Base64-encoded HMAC signing secret
    pub secret_base64: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Token lifetime in seconds
    pub ttl_seconds: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret_base64: DEFAULT_JWT_SECRET_BASE64.to_string(),
            algorithm: Algorithm::HS256,
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl TokenServiceConfig {
    /// Builds the service configuration from the shared JWT settings
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            DomainError::Token(TokenError::InvalidSigningKey {
                reason: format!("unknown algorithm {}", config.algorithm),
            })
        })?;

        Ok(Self {
            secret_base64: config.secret_base64.clone(),
            algorithm,
            ttl_seconds: config.ttl_seconds,
        })
    }

    /// Replaces the token lifetime
    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}
