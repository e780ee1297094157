//! Outbound delivery port of the verification engine

use async_trait::async_trait;

use crate::domain::value_objects::Channel;

/// Sends a code over a channel and returns the provider message id
///
/// One attempt per call; retries are not the dispatcher's concern.
#[async_trait]
pub trait ChannelDispatcher: Send + Sync {
    /// Send a code to an email address
    async fn send_email(&self, address: &str, code: &str) -> Result<String, String>;

    /// Send a code to a phone number
    async fn send_sms(&self, number: &str, code: &str) -> Result<String, String>;

    /// Route by channel
    async fn dispatch(&self, channel: Channel, destination: &str, code: &str) -> Result<String, String> {
        match channel {
            Channel::Email => self.send_email(destination, code).await,
            Channel::Sms => self.send_sms(destination, code).await,
        }
    }
}
