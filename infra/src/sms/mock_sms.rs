//! Mock SMS Service Implementation
//!
//! Records messages in memory instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use otp_shared::mask_phone;

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// Message captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
    pub message_id: String,
}

/// Mock SMS service for development and testing
#[derive(Clone, Default)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    outbox: Arc<Mutex<Vec<SentSms>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.outbox.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn last_sent_to(&self, phone_number: &str) -> Option<SentSms> {
        self.sent().into_iter().rev().find(|m| m.to == phone_number)
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(to = %mask_phone(phone_number), "Mock SMS service simulating failure");
            return Err(InfrastructureError::Sms("Simulated SMS failure".to_string()));
        }

        let message_id = format!("mock-sms-{}", Uuid::new_v4());
        self.outbox
            .lock()
            .map_err(|_| InfrastructureError::Sms("mock outbox poisoned".to_string()))?
            .push(SentSms {
                to: phone_number.to_string(),
                body: message.to_string(),
                message_id: message_id.clone(),
            });
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(to = %mask_phone(phone_number), message_id = %message_id, "Mock SMS recorded");
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
