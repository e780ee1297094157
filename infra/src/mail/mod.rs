//! Email Service Module
//!
//! Transactional email delivery for verification codes.
//!
//! - **Email Service Trait**: common interface for all mail providers
//! - **HTTP Implementation**: JSON mail API (Brevo-compatible) over `reqwest`
//! - **Mock Implementation**: records messages in memory for development and tests

use std::sync::Arc;

use otp_shared::config::MailConfig;

use crate::InfrastructureError;

pub mod email_service;
pub mod http_mail;
pub mod mock_email;

pub use email_service::EmailService;
pub use http_mail::HttpMailService;
pub use mock_email::{MockEmailService, SentEmail};


/// Create an email service based on configuration
///
/// # Returns
///
/// The provider named by `config.provider`, or a configuration error for an
/// unknown name or a provider missing its credentials.
pub fn create_email_service(config: &MailConfig) -> Result<Arc<dyn EmailService>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockEmailService::new())),
        "http" | "brevo" => {
            config
                .validate_credentials()
                .map_err(|e| InfrastructureError::Config(e.to_string()))?;
            Ok(Arc::new(HttpMailService::new(config.clone())?))
        }
        other => Err(InfrastructureError::Config(format!(
            "Unknown mail provider '{}'",
            other
        ))),
    }
}
