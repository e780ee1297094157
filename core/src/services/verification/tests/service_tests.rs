//! Unit tests for the verification engine

use chrono::{Duration, Utc};
use std::sync::Arc;

use otp_shared::config::MergePolicy;

use crate::domain::entities::{OtpIssue, VerificationState};
use crate::domain::value_objects::{Channel, ChannelProof, ConfirmRequest, VerificationOutcome};
use crate::errors::DomainError;
use crate::repositories::{IdentityRepository, InMemoryIdentityRepository};
use crate::services::verification::{
    ManualClock, OtpVerificationService, VerificationServiceConfig, OTP_CODE_LENGTH,
};

use super::mocks::{MockDispatcher, ReissuingRepository};

const EMAIL: &str = "a@x.com";
const PHONE: &str = "+15550100";

struct Harness {
    repository: Arc<InMemoryIdentityRepository>,
    dispatcher: Arc<MockDispatcher>,
    clock: Arc<ManualClock>,
    service: OtpVerificationService<InMemoryIdentityRepository, MockDispatcher>,
}

fn harness_with(dispatcher: MockDispatcher, config: VerificationServiceConfig) -> Harness {
    let repository = Arc::new(InMemoryIdentityRepository::new());
    let dispatcher = Arc::new(dispatcher);
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = OtpVerificationService::new(repository.clone(), dispatcher.clone(), config)
        .with_clock(clock.clone());

    Harness {
        repository,
        dispatcher,
        clock,
        service,
    }
}

fn harness() -> Harness {
    harness_with(MockDispatcher::new(), VerificationServiceConfig::default())
}

fn sms_enabled() -> VerificationServiceConfig {
    VerificationServiceConfig {
        sms_dispatch_enabled: true,
        ..Default::default()
    }
}

fn phone_proof(code: &str) -> ConfirmRequest {
    ConfirmRequest::PhoneOnly(ChannelProof::new(PHONE, code))
}

fn email_proof(code: &str) -> ConfirmRequest {
    ConfirmRequest::EmailOnly(ChannelProof::new(EMAIL, code))
}

#[tokio::test]
async fn test_initiate_stores_two_codes_with_shared_expiration() {
    let h = harness();

    let result = h.service.initiate(EMAIL, PHONE).await.unwrap();

    let record = h.repository.find_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(record.phone, PHONE);
    assert_eq!(record.email_otp.as_ref().map(String::len), Some(OTP_CODE_LENGTH));
    assert_eq!(record.phone_otp.as_ref().map(String::len), Some(OTP_CODE_LENGTH));
    assert_eq!(record.email_otp_expiration, Some(result.expires_at));
    assert_eq!(record.phone_otp_expiration, Some(result.expires_at));
    assert_eq!(result.expires_at - h.clock_now(), Duration::minutes(5));
    assert_eq!(record.state(), VerificationState::Unverified);
}

#[test]
fn test_config_reflects_construction() {
    let h = harness_with(MockDispatcher::new(), sms_enabled());

    assert!(h.service.config().sms_dispatch_enabled);
    assert_eq!(h.service.config().merge_policy, MergePolicy::MatchEither);
}

#[tokio::test]
async fn test_initiate_sends_only_email_by_default() {
    let h = harness();

    let result = h.service.initiate(EMAIL, PHONE).await.unwrap();

    assert_eq!(h.dispatcher.sent_count(Channel::Email), 1);
    assert_eq!(h.dispatcher.sent_count(Channel::Sms), 0);
    assert!(result.sms_message_id.is_none());
    assert_eq!(h.dispatcher.last_code(Channel::Email, EMAIL), result.record.email_otp);
}

#[tokio::test]
async fn test_initiate_sends_both_when_sms_enabled() {
    let h = harness_with(MockDispatcher::new(), sms_enabled());

    let result = h.service.initiate(EMAIL, PHONE).await.unwrap();

    assert!(result.sms_message_id.is_some());
    assert_eq!(h.dispatcher.last_code(Channel::Sms, PHONE), result.record.phone_otp);
}

#[tokio::test]
async fn test_initiate_requires_both_identifiers() {
    let h = harness();

    assert_eq!(
        h.service.initiate("", PHONE).await.unwrap_err(),
        DomainError::missing_identifiers()
    );
    assert_eq!(
        h.service.initiate(EMAIL, "").await.unwrap_err(),
        DomainError::missing_identifiers()
    );
    assert!(h.repository.is_empty().await);
}

#[tokio::test]
async fn test_dispatch_failure_keeps_codes_live() {
    let h = harness_with(MockDispatcher::failing_email(), VerificationServiceConfig::default());

    let err = h.service.initiate(EMAIL, PHONE).await.unwrap_err();
    assert!(matches!(err, DomainError::DispatchFailure { channel: Channel::Email, .. }));

    let record = h.repository.find_by_phone(PHONE).await.unwrap().unwrap();
    let code = record.phone_otp.clone().unwrap();
    let confirmed = h.service.confirm(&phone_proof(&code)).await.unwrap();
    assert_eq!(confirmed.outcome, VerificationOutcome::PartiallyVerified);
}

#[tokio::test]
async fn test_sms_failure_is_reported_when_enabled() {
    let h = harness_with(MockDispatcher::failing_sms(), sms_enabled());

    let err = h.service.initiate(EMAIL, PHONE).await.unwrap_err();

    assert!(matches!(err, DomainError::DispatchFailure { channel: Channel::Sms, .. }));
    assert_eq!(h.dispatcher.sent_count(Channel::Email), 1);
}

#[tokio::test]
async fn test_phone_then_email_reaches_full_verification() {
    let h = harness();
    let issued = h.service.initiate(EMAIL, PHONE).await.unwrap().record;

    let first = h
        .service
        .confirm(&phone_proof(issued.phone_otp.as_deref().unwrap()))
        .await
        .unwrap();
    assert_eq!(first.outcome, VerificationOutcome::PartiallyVerified);
    assert_eq!(first.record.state(), VerificationState::PhoneVerified);

    let second = h
        .service
        .confirm(&email_proof(issued.email_otp.as_deref().unwrap()))
        .await
        .unwrap();
    assert_eq!(second.outcome, VerificationOutcome::FullyVerified);
}

#[tokio::test]
async fn test_both_pairs_in_one_call() {
    let h = harness();
    let issued = h.service.initiate(EMAIL, PHONE).await.unwrap().record;

    let request = ConfirmRequest::from_parts(
        Some(PHONE.to_string()),
        issued.phone_otp.clone(),
        Some(EMAIL.to_string()),
        issued.email_otp.clone(),
    );
    let result = h.service.confirm(&request).await.unwrap();

    assert_eq!(result.outcome, VerificationOutcome::FullyVerified);
}

#[tokio::test]
async fn test_wrong_phone_code_short_circuits_email() {
    let h = harness();
    let issued = h.service.initiate(EMAIL, PHONE).await.unwrap().record;

    let request = ConfirmRequest::Both {
        phone: ChannelProof::new(PHONE, "000000"),
        email: ChannelProof::new(EMAIL, issued.email_otp.clone().unwrap()),
    };
    let err = h.service.confirm(&request).await.unwrap_err();

    assert_eq!(err, DomainError::InvalidOrExpiredOtp { channel: Channel::Sms });
    let record = h.repository.find_by_email(EMAIL).await.unwrap().unwrap();
    assert!(!record.email_verified);
    assert!(!record.phone_verified);
}

#[tokio::test]
async fn test_email_failure_keeps_phone_flag() {
    let h = harness();
    let issued = h.service.initiate(EMAIL, PHONE).await.unwrap().record;

    let request = ConfirmRequest::Both {
        phone: ChannelProof::new(PHONE, issued.phone_otp.clone().unwrap()),
        email: ChannelProof::new(EMAIL, "000000"),
    };
    let err = h.service.confirm(&request).await.unwrap_err();

    assert_eq!(err, DomainError::InvalidOrExpiredOtp { channel: Channel::Email });
    let record = h.repository.find_by_phone(PHONE).await.unwrap().unwrap();
    assert!(record.phone_verified);
    assert!(!record.email_verified);
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let h = harness();
    let issued = h.service.initiate(EMAIL, PHONE).await.unwrap().record;
    let code = issued.phone_otp.clone().unwrap();

    h.clock.advance(Duration::minutes(5));
    let err = h.service.confirm(&phone_proof(&code)).await.unwrap_err();

    assert_eq!(err, DomainError::InvalidOrExpiredOtp { channel: Channel::Sms });
    let record = h.repository.find_by_phone(PHONE).await.unwrap().unwrap();
    assert!(!record.phone_verified);
    assert_eq!(record.phone_otp, Some(code));
}

#[tokio::test]
async fn test_code_valid_just_before_expiration() {
    let h = harness();
    let issued = h.service.initiate(EMAIL, PHONE).await.unwrap().record;

    h.clock.advance(Duration::minutes(5) - Duration::milliseconds(1));
    let result = h.service.confirm(&email_proof(issued.email_otp.as_deref().unwrap())).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_unknown_identity() {
    let h = harness();

    let err = h.service.confirm(&phone_proof("123456")).await.unwrap_err();

    assert_eq!(err, DomainError::UserNotFound);
}

#[tokio::test]
async fn test_neither_pair_is_user_not_found() {
    let h = harness();
    h.service.initiate(EMAIL, PHONE).await.unwrap();

    let err = h.service.confirm(&ConfirmRequest::Neither).await.unwrap_err();

    assert_eq!(err, DomainError::UserNotFound);
    let record = h.repository.find_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(record.state(), VerificationState::Unverified);
}

#[tokio::test]
async fn test_confirm_keeps_codes_from_concurrent_initiate() {
    let repository = Arc::new(ReissuingRepository::new(InMemoryIdentityRepository::new()));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = OtpVerificationService::new(
        repository.clone(),
        Arc::new(MockDispatcher::new()),
        VerificationServiceConfig::default(),
    )
    .with_clock(clock.clone());

    let issued = service.initiate(EMAIL, PHONE).await.unwrap();
    let old_code = issued.record.phone_otp.clone().unwrap();
    let new_code = if old_code == "222222" { "333333" } else { "222222" };
    repository.reissue_after_next_lookup(OtpIssue {
        email: EMAIL.to_string(),
        phone: PHONE.to_string(),
        email_otp: new_code.to_string(),
        phone_otp: new_code.to_string(),
        expires_at: issued.expires_at,
        issued_at: issued.record.updated_at,
    });

    let result = service.confirm(&phone_proof(&old_code)).await.unwrap();
    assert_eq!(result.record.phone_otp.as_deref(), Some(new_code));

    let stored = repository.inner.find_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(stored.phone_otp.as_deref(), Some(new_code));
    assert_eq!(stored.email_otp.as_deref(), Some(new_code));

    let stale = service.confirm(&phone_proof(&old_code)).await.unwrap_err();
    assert_eq!(stale, DomainError::InvalidOrExpiredOtp { channel: Channel::Sms });
    assert!(service.confirm(&phone_proof(new_code)).await.is_ok());
}

#[tokio::test]
async fn test_replay_within_window_succeeds() {
    let h = harness();
    let issued = h.service.initiate(EMAIL, PHONE).await.unwrap().record;
    let code = issued.phone_otp.clone().unwrap();

    h.service.confirm(&phone_proof(&code)).await.unwrap();
    let replay = h.service.confirm(&phone_proof(&code)).await;

    assert!(replay.is_ok());
}

#[tokio::test]
async fn test_reinitiate_invalidates_codes_and_resets_flags() {
    let h = harness();
    let first = h.service.initiate(EMAIL, PHONE).await.unwrap().record;
    let old_phone = first.phone_otp.clone().unwrap();
    let old_email = first.email_otp.clone().unwrap();
    h.service.confirm(&phone_proof(&old_phone)).await.unwrap();
    h.service.confirm(&email_proof(&old_email)).await.unwrap();

    let second = h.service.initiate(EMAIL, PHONE).await.unwrap().record;

    assert_eq!(second.id, first.id);
    assert_eq!(second.state(), VerificationState::Unverified);
    if second.phone_otp.as_deref() != Some(old_phone.as_str()) {
        let err = h.service.confirm(&phone_proof(&old_phone)).await.unwrap_err();
        assert_eq!(err, DomainError::InvalidOrExpiredOtp { channel: Channel::Sms });
    }
}

#[tokio::test]
async fn test_partial_match_rebinds_phone_under_match_either() {
    let h = harness();
    let first = h.service.initiate(EMAIL, PHONE).await.unwrap().record;

    let second = h.service.initiate(EMAIL, "+15550199").await.unwrap().record;

    assert_eq!(first.id, second.id);
    assert_eq!(second.phone, "+15550199");
    assert_eq!(h.repository.len().await, 1);
}

#[tokio::test]
async fn test_require_consistent_refuses_partial_match() {
    let config = VerificationServiceConfig {
        merge_policy: MergePolicy::RequireConsistent,
        ..Default::default()
    };
    let h = harness_with(MockDispatcher::new(), config);
    h.service.initiate(EMAIL, PHONE).await.unwrap();

    let err = h.service.initiate(EMAIL, "+15550199").await.unwrap_err();

    assert!(matches!(err, DomainError::IdentityConflict { .. }));
    let record = h.repository.find_by_email(EMAIL).await.unwrap().unwrap();
    assert_eq!(record.phone, PHONE);
    assert_eq!(h.dispatcher.sent_count(Channel::Email), 1);
}

#[tokio::test]
async fn test_require_consistent_accepts_same_pair() {
    let config = VerificationServiceConfig {
        merge_policy: MergePolicy::RequireConsistent,
        ..Default::default()
    };
    let h = harness_with(MockDispatcher::new(), config);

    h.service.initiate(EMAIL, PHONE).await.unwrap();
    assert!(h.service.initiate(EMAIL, PHONE).await.is_ok());
}

#[tokio::test]
async fn test_store_unavailable_surfaces() {
    let h = harness();
    h.repository.set_unavailable(true);

    let err = h.service.initiate(EMAIL, PHONE).await.unwrap_err();

    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
    assert_eq!(h.dispatcher.sent_count(Channel::Email), 0);
}

#[tokio::test]
async fn test_serialized_initiates_leave_one_record() {
    let config = VerificationServiceConfig {
        serialize_initiate: true,
        ..Default::default()
    };
    let h = Arc::new(harness_with(MockDispatcher::new(), config));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let h = h.clone();
            tokio::spawn(async move { h.service.initiate(EMAIL, PHONE).await.map(|r| r.record.id) })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap());
    }
    ids.dedup();

    assert_eq!(ids.len(), 1);
    assert_eq!(h.repository.len().await, 1);
}

impl Harness {
    fn clock_now(&self) -> chrono::DateTime<Utc> {
        use crate::services::verification::Clock;
        self.clock.now()
    }
}
