//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing and route authorization configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{
    AuthConfig, JwtConfig, SecurityConfig, DEFAULT_JWT_SECRET_BASE64, DEFAULT_TOKEN_TTL_SECONDS,
    MAX_TOKEN_TTL_SECONDS,
};
pub use environment::{Environment, LogFormat, LogSinkConfig, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging.level = level;
        }
        logging.sink = LogSinkConfig::from_env();

        Self {
            environment,
            server: ServerConfig::from_env(),
            auth: AuthConfig::from_env(),
            logging,
        }
    }

    /// Configuration problems that should stop start-up
    pub fn validate(&self) -> Result<(), String> {
        let ttl = self.auth.jwt.ttl_seconds;
        if ttl <= 0 || ttl > MAX_TOKEN_TTL_SECONDS {
            return Err(format!(
                "token ttl must be between 1 and {} seconds, got {}",
                MAX_TOKEN_TTL_SECONDS, ttl
            ));
        }
        Ok(())
    }

    /// Production running on the built-in signing secret
    pub fn uses_public_secret_in_production(&self) -> bool {
        self.environment.is_production() && self.auth.jwt.is_using_default_secret()
    }
}
