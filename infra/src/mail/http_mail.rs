//! JSON HTTP mail API client
//!
//! Speaks the Brevo `POST /v3/smtp/email` shape: an `api-key` header and a
//! JSON body with sender, recipients, subject and text content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use otp_shared::config::MailConfig;
use otp_shared::mask_email;

use super::email_service::EmailService;
use crate::InfrastructureError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: EmailAddress<'a>,
    to: Vec<EmailAddress<'a>>,
    subject: &'a str,
    text_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

/// Mail provider client over HTTP
pub struct HttpMailService {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailService {
    /// Build the client; every request is bounded by `request_timeout_secs`
    pub fn new(config: MailConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailService for HttpMailService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, InfrastructureError> {
        let payload = SendEmailBody {
            sender: EmailAddress {
                email: &self.config.sender_email,
                name: self.config.sender_name.as_deref(),
            },
            to: vec![EmailAddress { email: to, name: None }],
            subject,
            text_content: body,
        };

        debug!(to = %mask_email(to), url = %self.config.api_url, "Sending email");

        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(to = %mask_email(to), status = status.as_u16(), "Mail provider rejected message");
            return Err(InfrastructureError::Mail(format!(
                "send failed (status={}): {}",
                status.as_u16(),
                body
            )));
        }

        let message_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id)
            .unwrap_or_else(|| format!("mail-{}", uuid::Uuid::new_v4()));

        info!(to = %mask_email(to), message_id = %message_id, "Email accepted by provider");
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "http"
    }
}
