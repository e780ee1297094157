//! Notification Dispatcher
//!
//! Implements the core `ChannelDispatcher` port on top of one email service
//! and one SMS service, rendering the verification message for each.

use async_trait::async_trait;
use std::sync::Arc;

use otp_core::services::verification::ChannelDispatcher;

use crate::mail::EmailService;
use crate::messages::{verification_message, EMAIL_SUBJECT};
use crate::sms::SmsService;

/// Adapter that implements the core ChannelDispatcher over the provider clients
pub struct NotificationDispatcher {
    email: Arc<dyn EmailService>,
    sms: Arc<dyn SmsService>,
    brand_name: String,
}

impl NotificationDispatcher {
    /// Create a dispatcher
    ///
    /// # Arguments
    ///
    /// * `email` - Email provider client
    /// * `sms` - SMS provider client
    /// * `brand_name` - Product name rendered into each message
    pub fn new(email: Arc<dyn EmailService>, sms: Arc<dyn SmsService>, brand_name: impl Into<String>) -> Self {
        Self {
            email,
            sms,
            brand_name: brand_name.into(),
        }
    }
}

#[async_trait]
impl ChannelDispatcher for NotificationDispatcher {
    async fn send_email(&self, address: &str, code: &str) -> Result<String, String> {
        let body = verification_message(&self.brand_name, code);
        self.email
            .send_email(address, EMAIL_SUBJECT, &body)
            .await
            .map_err(|e| e.to_string())
    }

    async fn send_sms(&self, number: &str, code: &str) -> Result<String, String> {
        let body = verification_message(&self.brand_name, code);
        self.sms
            .send_sms(number, &body)
            .await
            .map_err(|e| e.to_string())
    }
}
