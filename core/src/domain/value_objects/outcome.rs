//! Results of the initiate and confirm flows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::IdentityRecord;

/// Aggregate result of a successful confirm call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// Both flags are set on the last record touched
    FullyVerified,
    /// At least one submitted pair matched but a flag is still unset
    PartiallyVerified,
}

/// Confirm result with the record as last written
#[derive(Debug, Clone)]
pub struct ConfirmResult {
    pub outcome: VerificationOutcome,
    pub record: IdentityRecord,
}

/// Initiate result
#[derive(Debug, Clone)]
pub struct InitiateResult {
    /// Record after the upsert
    pub record: IdentityRecord,
    /// Shared expiration of both codes
    pub expires_at: DateTime<Utc>,
    /// Provider message id of the email
    pub email_message_id: String,
    /// Provider message id of the SMS, when SMS dispatch is enabled
    pub sms_message_id: Option<String>,
}
