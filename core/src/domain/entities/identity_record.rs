//! Identity record entity unifying a user's email, phone, outstanding codes
//! and per-channel verification flags.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Channel;

/// Fields written by an initiate call
///
/// Both codes share one expiration. Applying an issue always resets both
/// verified flags, even when only one channel is being re-verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpIssue {
    /// Email the record is keyed on
    pub email: String,
    /// Phone the record is keyed on
    pub phone: String,
    /// Code delivered over email
    pub email_otp: String,
    /// Code delivered over SMS
    pub phone_otp: String,
    /// Shared expiration of both codes
    pub expires_at: DateTime<Utc>,
    /// Instant the codes were generated
    pub issued_at: DateTime<Utc>,
}

/// Per-record position in the verification state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// Neither channel verified
    Unverified,
    /// Only the phone channel verified
    PhoneVerified,
    /// Only the email channel verified
    EmailVerified,
    /// Both channels verified
    FullyVerified,
}

/// Stored identity with its outstanding codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Surrogate key
    pub id: Uuid,

    /// Email address, unique across records
    pub email: String,

    /// Phone number, unique across records
    pub phone: String,

    /// Outstanding email code
    pub email_otp: Option<String>,

    /// Outstanding phone code
    pub phone_otp: Option<String>,

    /// Instant after which the email code is rejected
    pub email_otp_expiration: Option<DateTime<Utc>>,

    /// Instant after which the phone code is rejected
    pub phone_otp_expiration: Option<DateTime<Utc>>,

    /// Set once a matching email code was confirmed
    pub email_verified: bool,

    /// Set once a matching phone code was confirmed
    pub phone_verified: bool,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last write
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Creates a record from an initiate call that matched nothing
    pub fn from_issue(issue: &OtpIssue) -> Self {
        let mut record = Self {
            id: Uuid::new_v4(),
            email: issue.email.clone(),
            phone: issue.phone.clone(),
            email_otp: None,
            phone_otp: None,
            email_otp_expiration: None,
            phone_otp_expiration: None,
            email_verified: false,
            phone_verified: false,
            created_at: issue.issued_at,
            updated_at: issue.issued_at,
        };
        record.apply_issue(issue);
        record
    }

    /// Overwrites identifiers, both codes and the shared expiration, and clears both flags
    pub fn apply_issue(&mut self, issue: &OtpIssue) {
        self.email = issue.email.clone();
        self.phone = issue.phone.clone();
        self.email_otp = Some(issue.email_otp.clone());
        self.phone_otp = Some(issue.phone_otp.clone());
        self.email_otp_expiration = Some(issue.expires_at);
        self.phone_otp_expiration = Some(issue.expires_at);
        self.email_verified = false;
        self.phone_verified = false;
        self.updated_at = issue.issued_at;
    }

    /// Identifier the channel delivers to
    pub fn identifier(&self, channel: Channel) -> &str {
        match channel {
            Channel::Email => &self.email,
            Channel::Sms => &self.phone,
        }
    }

    /// Outstanding code for a channel
    pub fn otp(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Email => self.email_otp.as_deref(),
            Channel::Sms => self.phone_otp.as_deref(),
        }
    }

    /// Expiration of the outstanding code for a channel
    pub fn otp_expiration(&self, channel: Channel) -> Option<DateTime<Utc>> {
        match channel {
            Channel::Email => self.email_otp_expiration,
            Channel::Sms => self.phone_otp_expiration,
        }
    }

    /// Checks a submitted code against the stored one
    ///
    /// A code matches only if one is outstanding, it is byte-for-byte equal
    /// (compared in constant time) and `now` is strictly before its
    /// expiration. Expired codes are left in place.
    pub fn code_matches(&self, channel: Channel, submitted: &str, now: DateTime<Utc>) -> bool {
        let (Some(stored), Some(expires_at)) = (self.otp(channel), self.otp_expiration(channel)) else {
            return false;
        };
        constant_time_eq(stored.as_bytes(), submitted.as_bytes()) && now < expires_at
    }

    /// Whether a channel has been verified
    pub fn is_verified(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.email_verified,
            Channel::Sms => self.phone_verified,
        }
    }

    /// Sets the verified flag for a channel; the code stays valid
    pub fn mark_verified(&mut self, channel: Channel, now: DateTime<Utc>) {
        match channel {
            Channel::Email => self.email_verified = true,
            Channel::Sms => self.phone_verified = true,
        }
        self.updated_at = now;
    }

    /// Whether both channels are verified
    pub fn is_fully_verified(&self) -> bool {
        self.email_verified && self.phone_verified
    }

    /// Current state machine position
    pub fn state(&self) -> VerificationState {
        match (self.phone_verified, self.email_verified) {
            (false, false) => VerificationState::Unverified,
            (true, false) => VerificationState::PhoneVerified,
            (false, true) => VerificationState::EmailVerified,
            (true, true) => VerificationState::FullyVerified,
        }
    }
}
