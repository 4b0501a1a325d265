//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `EDUCONNECT` prefix and
//! `__` to separate nested values.
//!
//! # Example
//!
//! ```no_run
//! use educonnect_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod realtime;
mod server;

pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use realtime::RealtimeConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (JWT shared secret)
    pub auth: AuthConfig,

    /// Realtime fan-out and moderation settings
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `EDUCONNECT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `EDUCONNECT__SERVER__PORT=5000` -> `server.port = 5000`
    /// - `EDUCONNECT__DATABASE__URL=...` -> `database.url = ...`
    /// - `EDUCONNECT__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EDUCONNECT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.realtime.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("EDUCONNECT__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("EDUCONNECT__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for key in [
            "EDUCONNECT__DATABASE__URL",
            "EDUCONNECT__AUTH__JWT_SECRET",
            "EDUCONNECT__SERVER__PORT",
            "EDUCONNECT__SERVER__ENVIRONMENT",
            "EDUCONNECT__REALTIME__OUTBOX_CAPACITY",
        ] {
            env::remove_var(key);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.realtime.outbox_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_values() {
        let config = load_with(&[
            ("EDUCONNECT__SERVER__PORT", "3000"),
            ("EDUCONNECT__REALTIME__OUTBOX_CAPACITY", "16"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.realtime.outbox_capacity, 16);
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let config = load_with(&[("EDUCONNECT__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort(_))
        ));
    }
}
