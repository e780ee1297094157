//! Shared fixtures for the HTTP tests
//!
//! Builds the real service over the in-memory store and mock providers, with
//! a manual clock so expiry can be driven from the test.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{dev::ServiceResponse, http::StatusCode, test, web};
use serde_json::Value;

use otp_api::AppState;
use otp_core::repositories::InMemoryIdentityRepository;
use otp_core::services::verification::{ManualClock, OtpVerificationService, VerificationServiceConfig};
use otp_infra::mail::MockEmailService;
use otp_infra::sms::MockSmsService;
use otp_infra::NotificationDispatcher;

pub type TestState = AppState<InMemoryIdentityRepository, NotificationDispatcher>;

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub repository: InMemoryIdentityRepository,
    pub email: MockEmailService,
    pub sms: MockSmsService,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(VerificationServiceConfig::default())
    }

    pub fn with_config(config: VerificationServiceConfig) -> Self {
        let repository = InMemoryIdentityRepository::new();
        let email = MockEmailService::new();
        let sms = MockSmsService::new();
        let clock = Arc::new(ManualClock::default());

        let dispatcher = NotificationDispatcher::new(Arc::new(email.clone()), Arc::new(sms.clone()), "1Fi");
        let service = OtpVerificationService::new(Arc::new(repository.clone()), Arc::new(dispatcher), config)
            .with_clock(clock.clone());

        Self {
            state: web::Data::new(AppState::new(Arc::new(service))),
            repository,
            email,
            sms,
            clock,
        }
    }

    /// Code from the last email sent to `address`
    pub fn email_code(&self, address: &str) -> String {
        self.email
            .last_sent_to(address)
            .map(|sent| code_in(&sent.body))
            .unwrap_or_default()
    }

    /// Code from the last SMS sent to `number`
    pub fn sms_code(&self, number: &str) -> String {
        self.sms
            .last_sent_to(number)
            .map(|sent| code_in(&sent.body))
            .unwrap_or_default()
    }
}

/// Pulls the six-digit code out of a rendered message
pub fn code_in(body: &str) -> String {
    body.split_whitespace()
        .map(|word| word.trim_end_matches('.'))
        .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_default()
        .to_string()
}

/// Status and JSON body of a response
pub async fn status_and_body(response: ServiceResponse) -> (StatusCode, Value) {
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}
