//! Authentication and token signing configuration

use serde::{Deserialize, Serialize};

/// Reference signing secret (base64). Must be overridden outside development.
pub const DEFAULT_JWT_SECRET_BASE64: &str =
    "ZmlybWUtY29udHJhc2VuYS1qd3Qtc2VnYXJvLWRlLWZhbGxlLWxhdGV4";

/// Reference token lifetime: one hour
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Longest accepted token lifetime: one year
pub const MAX_TOKEN_TTL_SECONDS: i64 = 366 * 24 * 60 * 60;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Base64-encoded symmetric signing secret
    #[serde(default = "default_secret")]
    pub secret_base64: String,

    /// Token time-to-live in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: i64,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_base64: default_secret(),
            ttl_seconds: default_ttl(),
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with a base64 secret
    pub fn new(secret_base64: impl Into<String>) -> Self {
        Self {
            secret_base64: secret_base64.into(),
            ..Default::default()
        }
    }

    /// Set token lifetime in minutes
    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.ttl_seconds = minutes * 60;
        self
    }

    /// Set token lifetime in seconds
    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    /// Check if using the reference secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret_base64 == DEFAULT_JWT_SECRET_BASE64
    }
}

/// Request authorization rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Paths reachable without a bearer token. A trailing `/**` matches any sub-path.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Route authorization
    #[serde(default)]
    pub security: SecurityConfig,
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// `JWT_SECRET` is the base64 secret, `JWT_TTL_SECONDS` the token lifetime.
    /// Unset or unparsable values keep the reference defaults.
    pub fn from_env() -> Self {
        let secret_base64 = std::env::var("JWT_SECRET").unwrap_or_else(|_| default_secret());
        let ttl_seconds = std::env::var("JWT_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_ttl);

        Self {
            jwt: JwtConfig {
                secret_base64,
                ttl_seconds,
                algorithm: default_algorithm(),
            },
            security: SecurityConfig::default(),
        }
    }

    /// Get the base64 signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt.secret_base64
    }

    /// Get token lifetime in seconds
    pub fn token_ttl_seconds(&self) -> i64 {
        self.jwt.ttl_seconds
    }
}

fn default_secret() -> String {
    String::from(DEFAULT_JWT_SECRET_BASE64)
}

fn default_ttl() -> i64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_public_paths() -> Vec<String> {
    [
        "/api/login",
        "/h2-console/**",
        "/public/**",
        "/swagger-ui/**",
        "/v3/api-docs/**",
        "/health",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = JwtConfig::default();
        assert_eq!(config.ttl_seconds, 3600);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_builder_overrides() {
        let config = JwtConfig::new("c2VjcmV0").with_ttl_minutes(5);
        assert_eq!(config.ttl_seconds, 300);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let config: AuthConfig = serde_json::from_str(r#"{"jwt": {"ttl_seconds": 60}}"#).unwrap();
        assert_eq!(config.jwt.ttl_seconds, 60);
        assert!(config.jwt.is_using_default_secret());
        assert!(config.security.public_paths.contains(&"/api/login".to_string()));
    }
}
