//! In-memory identity store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{IdentityRecord, OtpIssue};
use crate::domain::value_objects::Channel;
use crate::errors::DomainError;

use super::trait_::IdentityRepository;

/// Identity store kept in process memory
///
/// Cloning shares the underlying map. `set_unavailable(true)` makes every
/// operation fail with `StoreUnavailable` without touching stored state.
#[derive(Clone, Default)]
pub struct InMemoryIdentityRepository {
    records: Arc<RwLock<HashMap<Uuid, IdentityRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryIdentityRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend going away (or coming back)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored records
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable {
                message: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn clashes(records: &HashMap<Uuid, IdentityRecord>, id: Option<Uuid>, email: &str, phone: &str) -> bool {
    records
        .values()
        .any(|r| Some(r.id) != id && (r.email == email || r.phone == phone))
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn upsert_by_email_or_phone(&self, issue: &OtpIssue) -> Result<IdentityRecord, DomainError> {
        self.ensure_available()?;
        let mut records = self.records.write().await;

        let target = records
            .values()
            .find(|r| r.email == issue.email)
            .or_else(|| records.values().find(|r| r.phone == issue.phone))
            .map(|r| r.id);

        if clashes(&records, target, &issue.email, &issue.phone) {
            return Err(DomainError::IdentityConflict {
                message: "Email or phone is already bound to another identity".to_string(),
            });
        }

        let record = match target.and_then(|id| records.get_mut(&id)) {
            Some(existing) => {
                existing.apply_issue(issue);
                existing.clone()
            }
            None => {
                let created = IdentityRecord::from_issue(issue);
                records.insert(created.id, created.clone());
                created
            }
        };

        Ok(record)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<IdentityRecord>, DomainError> {
        self.ensure_available()?;
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.phone == phone).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, DomainError> {
        self.ensure_available()?;
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.email == email).cloned())
    }

    async fn mark_verified(
        &self,
        id: Uuid,
        channel: Channel,
        at: DateTime<Utc>,
    ) -> Result<IdentityRecord, DomainError> {
        self.ensure_available()?;
        let mut records = self.records.write().await;

        let record = records.get_mut(&id).ok_or(DomainError::UserNotFound)?;
        record.mark_verified(channel, at);
        Ok(record.clone())
    }
}
