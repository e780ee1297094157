//! ClickSend SMS Service Implementation
//!
//! Sends through `POST /v3/sms/send` with HTTP Basic auth built from the
//! configured username and API key. One attempt per message.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use otp_shared::config::SmsConfig;
use otp_shared::mask_phone;

use super::sms_service::SmsService;
use crate::InfrastructureError;

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    source: &'a str,
    from: &'a str,
    to: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    messages: Vec<OutboundMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    response_code: Option<String>,
    data: Option<SendResponseData>,
}

#[derive(Debug, Deserialize)]
struct SendResponseData {
    #[serde(default)]
    messages: Vec<MessageReceipt>,
}

#[derive(Debug, Deserialize)]
struct MessageReceipt {
    message_id: Option<String>,
    status: Option<String>,
}

/// ClickSend SMS service implementation
pub struct ClickSendSmsService {
    client: reqwest::Client,
    config: SmsConfig,
    authorization: String,
}

impl ClickSendSmsService {
    /// Build the client; every request is bounded by `request_timeout_secs`
    pub fn new(config: SmsConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let authorization = basic_auth(&config.username, &config.api_key);

        Ok(Self {
            client,
            config,
            authorization,
        })
    }
}

/// `Authorization` header value for HTTP Basic auth
pub fn basic_auth(username: &str, api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, api_key)))
}

#[async_trait]
impl SmsService for ClickSendSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let payload = SendRequest {
            messages: vec![OutboundMessage {
                source: "otp-gateway",
                from: &self.config.sender_id,
                to: phone_number,
                body: message,
            }],
        };

        debug!(to = %mask_phone(phone_number), "Sending SMS via ClickSend");

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", &self.authorization)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(to = %mask_phone(phone_number), status = status.as_u16(), "ClickSend rejected request");
            return Err(InfrastructureError::Sms(format!(
                "ClickSend request failed (status={}): {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: SendResponse = response.json().await?;
        let receipt = parsed
            .data
            .and_then(|data| data.messages.into_iter().next())
            .ok_or_else(|| {
                InfrastructureError::Sms(format!(
                    "ClickSend returned no message receipt (response_code={})",
                    parsed.response_code.as_deref().unwrap_or("unknown")
                ))
            })?;

        match receipt.status.as_deref() {
            Some("SUCCESS") => {
                let message_id = receipt.message_id.unwrap_or_default();
                info!(to = %mask_phone(phone_number), message_id = %message_id, "SMS accepted by ClickSend");
                Ok(message_id)
            }
            other => {
                error!(to = %mask_phone(phone_number), status = ?other, "ClickSend did not queue message");
                Err(InfrastructureError::Sms(format!(
                    "ClickSend message status {}",
                    other.unwrap_or("missing")
                )))
            }
        }
    }

    fn provider_name(&self) -> &str {
        "clicksend"
    }
}
