//! Environment and logging configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Application environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Get environment from ENV variable
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| String::from("development"))
            .parse()
            .unwrap_or(Environment::Development)
    }

    /// Get the configuration file name for this environment (without extension)
    pub fn config_file(&self) -> &str {
        match self {
            Environment::Development => "config.development",
            Environment::Staging => "config.staging",
            Environment::Production => "config.production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter directive (trace, debug, info, warn, error, or an env-filter string)
    pub level: String,

    /// Log format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Structured log document sink
    #[serde(default)]
    pub sink: Option<LogSinkConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: default_log_format(),
            sink: None,
        }
    }
}

impl LoggingConfig {
    /// Create logging config for environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                sink: None,
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                sink: None,
            },
            Environment::Production => Self {
                level: String::from("warn"),
                format: LogFormat::Json,
                sink: None,
            },
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// Destination for structured log documents
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogSinkConfig {
    /// Connection URI; its path names the database (`scheme://host:port/database`)
    #[serde(default)]
    pub uri: String,

    /// Collection receiving the documents
    #[serde(default)]
    pub collection: String,

    /// Application name stamped on every document
    #[serde(default = "default_application")]
    pub application: String,

    /// Local directory holding the JSON-lines document files
    #[serde(default = "default_sink_directory")]
    pub directory: String,
}

impl LogSinkConfig {
    /// Read `LOG_SINK_URI`, `LOG_SINK_COLLECTION` and `LOG_SINK_APPLICATION`.
    /// Returns `None` when no URI is set.
    pub fn from_env() -> Option<Self> {
        let uri = env::var("LOG_SINK_URI").ok()?;
        Some(Self {
            uri,
            collection: env::var("LOG_SINK_COLLECTION")
                .unwrap_or_else(|_| String::from("application_logs")),
            application: env::var("LOG_SINK_APPLICATION").unwrap_or_else(|_| default_application()),
            directory: env::var("LOG_SINK_DIR").unwrap_or_else(|_| default_sink_directory()),
        })
    }
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_application() -> String {
    String::from("artefact")
}

fn default_sink_directory() -> String {
    String::from("logs")
}
