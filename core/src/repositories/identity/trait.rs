//! Identity store interface.
//!
//! The store keeps one record per identity with email and phone each unique
//! across records. Implementations live in the infrastructure layer; the
//! in-memory one in this crate backs tests and the `memory` store backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{IdentityRecord, OtpIssue};
use crate::domain::value_objects::Channel;
use crate::errors::DomainError;

/// Repository trait for identity record persistence
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use chrono::{DateTime, Utc};
/// use uuid::Uuid;
/// use otp_core::repositories::IdentityRepository;
/// use otp_core::domain::entities::{IdentityRecord, OtpIssue};
/// use otp_core::domain::value_objects::Channel;
/// use otp_core::errors::DomainError;
///
/// struct KeyValueIdentityRepository;
///
/// #[async_trait]
/// impl IdentityRepository for KeyValueIdentityRepository {
///     async fn upsert_by_email_or_phone(&self, issue: &OtpIssue) -> Result<IdentityRecord, DomainError> {
///         Ok(IdentityRecord::from_issue(issue))
///     }
///
///     async fn find_by_phone(&self, _phone: &str) -> Result<Option<IdentityRecord>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_email(&self, _email: &str) -> Result<Option<IdentityRecord>, DomainError> {
///         Ok(None)
///     }
///
///     async fn mark_verified(
///         &self,
///         _id: Uuid,
///         _channel: Channel,
///         _at: DateTime<Utc>,
///     ) -> Result<IdentityRecord, DomainError> {
///         Err(DomainError::UserNotFound)
///     }
/// }
/// ```
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Write a freshly issued code pair
    ///
    /// Finds the record whose email equals `issue.email` or whose phone equals
    /// `issue.phone` (an email match wins when both exist), overwrites both
    /// identifiers, both codes, the shared expiration and resets both
    /// verified flags. Creates a record when nothing matches.
    ///
    /// # Returns
    /// * `Ok(IdentityRecord)` - The record as written
    /// * `Err(DomainError::IdentityConflict)` - The write would give two records the same email or phone
    /// * `Err(DomainError::StoreUnavailable)` - Backend unreachable; nothing was written
    async fn upsert_by_email_or_phone(&self, issue: &OtpIssue) -> Result<IdentityRecord, DomainError>;

    /// Find the record bound to a phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<IdentityRecord>, DomainError>;

    /// Find the record bound to an email address
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, DomainError>;

    /// Set one channel's verified flag on a stored record
    ///
    /// Only the flag and `updated_at` are written. Codes, expirations and
    /// identifiers keep whatever the store currently holds, so a concurrent
    /// initiate is never rolled back.
    ///
    /// # Returns
    /// * `Ok(IdentityRecord)` - The record as stored after the update
    /// * `Err(DomainError::UserNotFound)` - No record with this id exists
    async fn mark_verified(
        &self,
        id: Uuid,
        channel: Channel,
        at: DateTime<Utc>,
    ) -> Result<IdentityRecord, DomainError>;
}
