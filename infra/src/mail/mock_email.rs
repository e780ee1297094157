//! Mock Email Service Implementation
//!
//! Keeps sent messages in memory instead of delivering them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use otp_shared::mask_email;

use super::email_service::EmailService;
use crate::InfrastructureError;

/// Message captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub message_id: String,
}

/// Mock email service for development and testing
///
/// Clones share the outbox, so a test can keep a handle while the
/// dispatcher owns another.
#[derive(Clone, Default)]
pub struct MockEmailService {
    outbox: Arc<Mutex<Vec<SentEmail>>>,
    simulate_failure: Arc<AtomicBool>,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// All messages sent so far
    pub fn sent(&self) -> Vec<SentEmail> {
        self.outbox.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Most recent message to an address
    pub fn last_sent_to(&self, to: &str) -> Option<SentEmail> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, InfrastructureError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(to = %mask_email(to), "Mock email service simulating failure");
            return Err(InfrastructureError::Mail("Simulated email failure".to_string()));
        }

        let message_id = format!("mock-mail-{}", Uuid::new_v4());
        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| InfrastructureError::Mail("mock outbox poisoned".to_string()))?;
        outbox.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            message_id: message_id.clone(),
        });

        info!(to = %mask_email(to), message_id = %message_id, "Mock email recorded");
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
