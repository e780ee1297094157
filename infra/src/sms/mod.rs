//! SMS Service Module
//!
//! SMS delivery for verification codes.
//!
//! - **SMS Service Trait**: common interface for all SMS providers
//! - **ClickSend Support**: REST v3 API with HTTP Basic auth
//! - **Mock Implementation**: records messages in memory for development and tests

use std::sync::Arc;

use otp_shared::config::SmsConfig;

use crate::InfrastructureError;

pub mod clicksend;
pub mod mock_sms;
pub mod sms_service;

pub use clicksend::ClickSendSmsService;
pub use mock_sms::{MockSmsService, SentSms};
pub use sms_service::SmsService;


/// Create an SMS service based on configuration
///
/// Unknown providers and missing credentials are configuration errors;
/// nothing silently falls back to the mock.
pub fn create_sms_service(config: &SmsConfig) -> Result<Arc<dyn SmsService>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockSmsService::new())),
        "clicksend" => {
            config
                .validate_credentials()
                .map_err(|e| InfrastructureError::Config(e.to_string()))?;
            Ok(Arc::new(ClickSendSmsService::new(config.clone())?))
        }
        other => Err(InfrastructureError::Config(format!(
            "Unknown SMS provider '{}'",
            other
        ))),
    }
}
