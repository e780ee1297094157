//! Email and SMS provider configuration
//!
//! Credentials are handed to the provider clients when they are constructed;
//! nothing below the binary reads them from the process environment.

use serde::{Deserialize, Serialize};

use super::{env_or, env_parse, ConfigError};

/// Transactional email provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Provider name ("http", "mock")
    pub provider: String,

    /// Send endpoint of the JSON mail API
    pub api_url: String,

    /// API key sent in the `api-key` header
    #[serde(default)]
    pub api_key: String,

    /// Sender address
    pub sender_email: String,

    /// Sender display name
    #[serde(default)]
    pub sender_name: Option<String>,

    /// Upper bound for one provider request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            api_url: String::from("https://api.brevo.com/v3/smtp/email"),
            api_key: String::new(),
            sender_email: String::from("no-reply@localhost"),
            sender_name: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl MailConfig {
    /// Create from `MAIL_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            provider: env_or("MAIL_PROVIDER", &defaults.provider),
            api_url: env_or("MAIL_API_URL", &defaults.api_url),
            api_key: env_or("MAIL_API_KEY", ""),
            sender_email: env_or("MAIL_SENDER_EMAIL", &defaults.sender_email),
            sender_name: std::env::var("MAIL_SENDER_NAME").ok(),
            request_timeout_secs: env_parse("MAIL_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
        })
    }

    /// Ensure a real provider has its credentials
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        if self.provider == "mock" {
            return Ok(());
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "MAIL_API_KEY".to_string(),
            });
        }
        if self.sender_email.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "MAIL_SENDER_EMAIL".to_string(),
            });
        }
        Ok(())
    }
}

/// SMS provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Provider name ("clicksend", "mock")
    pub provider: String,

    /// Send endpoint of the SMS API
    pub api_url: String,

    /// API username
    #[serde(default)]
    pub username: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Sender id shown to the recipient
    pub sender_id: String,

    /// Upper bound for one provider request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            api_url: String::from("https://rest.clicksend.com/v3/sms/send"),
            username: String::new(),
            api_key: String::new(),
            sender_id: String::from("OTP"),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl SmsConfig {
    /// Create from `SMS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            provider: env_or("SMS_PROVIDER", &defaults.provider),
            api_url: env_or("SMS_API_URL", &defaults.api_url),
            username: env_or("SMS_API_USERNAME", ""),
            api_key: env_or("SMS_API_KEY", ""),
            sender_id: env_or("SMS_SENDER_ID", &defaults.sender_id),
            request_timeout_secs: env_parse("SMS_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
        })
    }

    /// Ensure a real provider has its credentials
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        if self.provider == "mock" {
            return Ok(());
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "SMS_API_USERNAME".to_string(),
            });
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "SMS_API_KEY".to_string(),
            });
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_providers_need_no_credentials() {
        assert!(MailConfig::default().validate_credentials().is_ok());
        assert!(SmsConfig::default().validate_credentials().is_ok());
    }

    #[test]
    fn test_clicksend_requires_username_and_key() {
        let mut config = SmsConfig {
            provider: "clicksend".to_string(),
            ..Default::default()
        };
        assert!(config.validate_credentials().is_err());

        config.username = "user".to_string();
        config.api_key = "key".to_string();
        assert!(config.validate_credentials().is_ok());
    }
}
