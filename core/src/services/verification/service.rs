//! Initiate and confirm flows over one identity record per user

use std::sync::Arc;

use otp_shared::config::MergePolicy;
use otp_shared::{mask_email, mask_phone};

use crate::domain::entities::{IdentityRecord, OtpIssue};
use crate::domain::value_objects::{
    Channel, ConfirmRequest, ConfirmResult, InitiateResult, VerificationOutcome,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::IdentityRepository;

use super::clock::{Clock, SystemClock};
use super::config::VerificationServiceConfig;
use super::generator::CodeGenerator;
use super::identity_lock::IdentityLocks;
use super::traits::ChannelDispatcher;

/// Verification engine issuing and checking email and phone codes
///
/// Both type parameters may be unsized so the binary can pick the store at
/// runtime (`OtpVerificationService<dyn IdentityRepository, _>`).
pub struct OtpVerificationService<R, D>
where
    R: IdentityRepository + ?Sized,
    D: ChannelDispatcher + ?Sized,
{
    /// Identity store
    repository: Arc<R>,
    /// Email and SMS delivery
    dispatcher: Arc<D>,
    /// Service configuration
    config: VerificationServiceConfig,
    clock: Arc<dyn Clock>,
    locks: IdentityLocks,
}

impl<R, D> OtpVerificationService<R, D>
where
    R: IdentityRepository + ?Sized,
    D: ChannelDispatcher + ?Sized,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `repository` - Identity store implementation
    /// * `dispatcher` - Channel dispatcher implementation
    /// * `config` - Service configuration
    pub fn new(repository: Arc<R>, dispatcher: Arc<D>, config: VerificationServiceConfig) -> Self {
        Self {
            repository,
            dispatcher,
            config,
            clock: Arc::new(SystemClock),
            locks: IdentityLocks::new(),
        }
    }

    /// Replace the wall clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Dispatch and merge settings the service was built with
    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue fresh codes for an identity and deliver them
    ///
    /// This method:
    /// 1. Rejects an empty email or phone
    /// 2. Generates one code per channel with a shared five-minute expiration
    /// 3. Applies the merge policy and upserts the record, resetting both flags
    /// 4. Sends the email code, and the phone code when SMS dispatch is enabled
    ///
    /// Codes stay stored when delivery fails; the caller sees `DispatchFailure`.
    pub async fn initiate(&self, email: &str, phone: &str) -> DomainResult<InitiateResult> {
        if email.is_empty() || phone.is_empty() {
            return Err(DomainError::missing_identifiers());
        }

        let _guard = if self.config.serialize_initiate {
            Some(self.locks.acquire(email, phone).await)
        } else {
            None
        };

        let now = self.clock.now();
        let issue = OtpIssue {
            email: email.to_string(),
            phone: phone.to_string(),
            email_otp: CodeGenerator::generate_code(),
            phone_otp: CodeGenerator::generate_code(),
            expires_at: CodeGenerator::expiration_from(now),
            issued_at: now,
        };

        if self.config.merge_policy == MergePolicy::RequireConsistent {
            self.ensure_consistent(email, phone).await?;
        }

        let record = self.repository.upsert_by_email_or_phone(&issue).await?;

        tracing::info!(
            record_id = %record.id,
            email = %mask_email(email),
            phone = %mask_phone(phone),
            expires_at = %issue.expires_at,
            event = "otp_issued",
            "Issued email and phone codes"
        );

        let (email_result, sms_result) = if self.config.sms_dispatch_enabled {
            let (email_result, sms_result) = tokio::join!(
                self.dispatcher.send_email(email, &issue.email_otp),
                self.dispatcher.send_sms(phone, &issue.phone_otp),
            );
            (email_result, Some(sms_result))
        } else {
            (self.dispatcher.send_email(email, &issue.email_otp).await, None)
        };

        let email_message_id = email_result.map_err(|message| {
            self.dispatch_failure(Channel::Email, &mask_email(email), message)
        })?;
        let sms_message_id = sms_result
            .transpose()
            .map_err(|message| self.dispatch_failure(Channel::Sms, &mask_phone(phone), message))?;

        tracing::info!(
            record_id = %record.id,
            email_message_id = %email_message_id,
            sms_message_id = ?sms_message_id,
            event = "otp_dispatched",
            "Delivered verification codes"
        );

        Ok(InitiateResult {
            expires_at: issue.expires_at,
            record,
            email_message_id,
            sms_message_id,
        })
    }

    /// Check submitted codes and set the matching verified flags
    ///
    /// The phone pair is evaluated before the email pair. The first pair that
    /// fails aborts the call and later pairs are not looked at; flags set by
    /// earlier pairs stay set. Codes are not consumed, so replaying a valid
    /// code succeeds until it expires. A request without any complete pair
    /// touches no record and reports `UserNotFound`.
    pub async fn confirm(&self, request: &ConfirmRequest) -> DomainResult<ConfirmResult> {
        let mut last_record = None;

        for (channel, proof) in request.proofs() {
            let record = self
                .lookup(channel, &proof.identifier)
                .await?
                .ok_or(DomainError::UserNotFound)?;

            let now = self.clock.now();
            if !record.code_matches(channel, &proof.code, now) {
                tracing::warn!(
                    record_id = %record.id,
                    channel = %channel,
                    event = "otp_rejected",
                    "Submitted code is wrong or expired"
                );
                return Err(DomainError::InvalidOrExpiredOtp { channel });
            }

            let saved = self.repository.mark_verified(record.id, channel, now).await?;

            tracing::info!(
                record_id = %saved.id,
                channel = %channel,
                state = ?saved.state(),
                event = "otp_verified",
                "Channel verified"
            );
            last_record = Some(saved);
        }

        let record = last_record.ok_or(DomainError::UserNotFound)?;
        let outcome = if record.is_fully_verified() {
            VerificationOutcome::FullyVerified
        } else {
            VerificationOutcome::PartiallyVerified
        };

        Ok(ConfirmResult { outcome, record })
    }

    async fn lookup(&self, channel: Channel, identifier: &str) -> DomainResult<Option<IdentityRecord>> {
        match channel {
            Channel::Sms => self.repository.find_by_phone(identifier).await,
            Channel::Email => self.repository.find_by_email(identifier).await,
        }
    }

    /// Refuses an initiate whose email and phone do not already belong together
    async fn ensure_consistent(&self, email: &str, phone: &str) -> DomainResult<()> {
        let by_email = self.repository.find_by_email(email).await?;
        let by_phone = self.repository.find_by_phone(phone).await?;

        let message = match (by_email, by_phone) {
            (Some(a), Some(b)) if a.id != b.id => "Email and phone belong to different identities",
            (Some(_), None) => "Email is already registered with a different phone",
            (None, Some(_)) => "Phone is already registered with a different email",
            _ => return Ok(()),
        };

        tracing::warn!(
            email = %mask_email(email),
            phone = %mask_phone(phone),
            event = "identity_conflict",
            "{}",
            message
        );
        Err(DomainError::IdentityConflict {
            message: message.to_string(),
        })
    }

    fn dispatch_failure(&self, channel: Channel, destination: &str, message: String) -> DomainError {
        tracing::error!(
            channel = %channel,
            destination = %destination,
            error = %message,
            event = "otp_dispatch_failed",
            "Failed to deliver verification code"
        );
        DomainError::DispatchFailure { channel, message }
    }
}
