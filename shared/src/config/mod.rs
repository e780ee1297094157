//! Configuration module with one sub-module per concern
//!
//! - `database` - identity store backend and MySQL pool settings
//! - `environment` - environment detection and logging configuration
//! - `notification` - email and SMS provider credentials
//! - `server` - HTTP listener and CORS
//! - `verification` - OTP dispatch and identity merge policy

pub mod database;
pub mod environment;
pub mod notification;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use database::{DatabaseConfig, StoreBackend};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notification::{MailConfig, SmsConfig};
pub use server::{CorsConfig, ServerConfig};
pub use verification::{MergePolicy, VerificationConfig};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required setting: {key}")]
    Missing { key: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Identity store configuration
    pub database: DatabaseConfig,

    /// Email provider configuration
    pub mail: MailConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// OTP flow configuration
    pub verification: VerificationConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Every setting has a default, so an empty environment yields a
    /// development configuration backed by the in-memory store and mock
    /// providers.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        Ok(Self {
            environment,
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            mail: MailConfig::from_env()?,
            sms: SmsConfig::from_env()?,
            verification: VerificationConfig::from_env()?,
            cors: CorsConfig::from_env(),
            logging: LoggingConfig::from_env(environment)?,
        })
    }

    /// Reject configurations that cannot work in the current environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.environment.is_production() {
            return Ok(());
        }

        if self.database.backend == StoreBackend::Memory {
            return Err(ConfigError::InvalidValue {
                key: "STORE_BACKEND".to_string(),
                value: "memory".to_string(),
            });
        }
        self.mail.validate_credentials()?;
        if self.verification.sms_dispatch_enabled {
            self.sms.validate_credentials()?;
        }
        Ok(())
    }
}

/// Read an environment variable, falling back to `default` when unset
pub(crate) fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to `default` when unset
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

/// Read a boolean flag accepting `true/false`, `1/0`, `yes/no` and `on/off`
pub(crate) fn env_flag(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_development() {
        let config = AppConfig::default();
        assert!(config.environment.is_development());
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert!(!config.verification.sms_dispatch_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_rejects_memory_store() {
        let config = AppConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
    }

    #[test]
    fn test_production_requires_mail_credentials() {
        let config = AppConfig {
            environment: Environment::Production,
            database: DatabaseConfig {
                backend: StoreBackend::MySql,
                ..Default::default()
            },
            mail: MailConfig {
                provider: "http".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("OTP_SHARED_TEST_PORT", "not-a-port");
        let result: Result<u16, _> = env_parse("OTP_SHARED_TEST_PORT", 5000);
        assert!(result.is_err());
        std::env::remove_var("OTP_SHARED_TEST_PORT");

        let result: Result<u16, _> = env_parse("OTP_SHARED_TEST_PORT", 5000);
        assert_eq!(result.unwrap(), 5000);
    }

    #[test]
    fn test_env_flag_variants() {
        std::env::set_var("OTP_SHARED_TEST_FLAG", "yes");
        assert!(env_flag("OTP_SHARED_TEST_FLAG", false).unwrap());
        std::env::set_var("OTP_SHARED_TEST_FLAG", "off");
        assert!(!env_flag("OTP_SHARED_TEST_FLAG", true).unwrap());
        std::env::set_var("OTP_SHARED_TEST_FLAG", "maybe");
        assert!(env_flag("OTP_SHARED_TEST_FLAG", true).is_err());
        std::env::remove_var("OTP_SHARED_TEST_FLAG");
    }
}
