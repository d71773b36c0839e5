//! Layered application configuration
//!
//! Precedence, lowest first:
//! 1. Built-in defaults and the plain environment variables read by
//!    `AppConfig::from_env` (`JWT_SECRET`, `JWT_TTL_SECONDS`, `SERVER_PORT`, ...)
//! 2. An optional `config.<environment>` file (TOML, YAML or JSON)
//! 3. `APP__*` variables, `__` separating nested keys (`APP__AUTH__JWT__TTL_SECONDS=600`)

use af_shared::AppConfig;
use config::{Config, ConfigError, Environment, File};

/// Load and validate the application configuration
pub fn load() -> Result<AppConfig, ConfigError> {
    let base = AppConfig::from_env();
    let file = base.environment.config_file().to_string();

    let config: AppConfig = Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::with_name(&file).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.security.public_paths")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    config.validate().map_err(ConfigError::Message)?;
    Ok(config)
}
