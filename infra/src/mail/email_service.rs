//! Email Service Interface

use async_trait::async_trait;

use crate::InfrastructureError;

/// Email service trait for sending plain-text messages
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email
    ///
    /// # Arguments
    ///
    /// * `to` - Recipient address
    /// * `subject` - Subject line
    /// * `body` - Plain-text body
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the accepted message
    /// * `Err(InfrastructureError)` - If the provider rejected the message or was unreachable
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, InfrastructureError>;

    /// Get the service provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    async fn is_available(&self) -> bool {
        true
    }
}
