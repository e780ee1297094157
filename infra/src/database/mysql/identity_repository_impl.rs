//! MySQL implementation of the IdentityRepository trait.
//!
//! Upserts run in a transaction that locks the matched row with
//! `SELECT ... FOR UPDATE`, so two initiates for the same identity cannot
//! interleave between the lookup and the write. The unique keys on `email`
//! and `phone` turn a cross-identity clash into `IdentityConflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use otp_core::domain::entities::{IdentityRecord, OtpIssue};
use otp_core::domain::value_objects::Channel;
use otp_core::errors::DomainError;
use otp_core::repositories::IdentityRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, email, phone, email_otp, phone_otp,
           email_otp_expiration, phone_otp_expiration,
           email_verified, phone_verified, created_at, updated_at
    FROM identity_records
"#;

/// MySQL implementation of IdentityRepository
pub struct MySqlIdentityRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlIdentityRepository {
    /// Create a new MySQL identity repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to IdentityRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<IdentityRecord, DomainError> {
        let id: String = row.try_get("id").map_err(column_error)?;

        Ok(IdentityRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::StoreUnavailable {
                message: format!("Invalid UUID in identity_records.id: {}", e),
            })?,
            email: row.try_get("email").map_err(column_error)?,
            phone: row.try_get("phone").map_err(column_error)?,
            email_otp: row.try_get("email_otp").map_err(column_error)?,
            phone_otp: row.try_get("phone_otp").map_err(column_error)?,
            email_otp_expiration: row
                .try_get::<Option<DateTime<Utc>>, _>("email_otp_expiration")
                .map_err(column_error)?,
            phone_otp_expiration: row
                .try_get::<Option<DateTime<Utc>>, _>("phone_otp_expiration")
                .map_err(column_error)?,
            email_verified: row.try_get("email_verified").map_err(column_error)?,
            phone_verified: row.try_get("phone_verified").map_err(column_error)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(column_error)?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(column_error)?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<IdentityRecord>, DomainError> {
        let query = format!("{} WHERE {} = ? LIMIT 1", SELECT_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::StoreUnavailable {
        message: format!("Failed to decode identity record: {}", e),
    }
}

/// Maps a driver error onto the domain taxonomy
fn store_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return DomainError::IdentityConflict {
                message: "Email or phone is already bound to another identity".to_string(),
            };
        }
    }
    tracing::error!(error = %e, "Identity store query failed");
    DomainError::StoreUnavailable {
        message: e.to_string(),
    }
}

#[async_trait]
impl IdentityRepository for MySqlIdentityRepository {
    async fn upsert_by_email_or_phone(&self, issue: &OtpIssue) -> Result<IdentityRecord, DomainError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let query = format!(
            "{} WHERE email = ? OR phone = ? ORDER BY (email = ?) DESC LIMIT 1 FOR UPDATE",
            SELECT_COLUMNS
        );
        let existing = sqlx::query(&query)
            .bind(&issue.email)
            .bind(&issue.phone)
            .bind(&issue.email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error)?;

        let record = match existing {
            Some(row) => {
                let mut record = Self::row_to_record(&row)?;
                record.apply_issue(issue);

                sqlx::query(
                    r#"
                    UPDATE identity_records SET
                        email = ?,
                        phone = ?,
                        email_otp = ?,
                        phone_otp = ?,
                        email_otp_expiration = ?,
                        phone_otp_expiration = ?,
                        email_verified = ?,
                        phone_verified = ?,
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&record.email)
                .bind(&record.phone)
                .bind(&record.email_otp)
                .bind(&record.phone_otp)
                .bind(record.email_otp_expiration)
                .bind(record.phone_otp_expiration)
                .bind(record.email_verified)
                .bind(record.phone_verified)
                .bind(record.updated_at)
                .bind(record.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(store_error)?;

                record
            }
            None => {
                let record = IdentityRecord::from_issue(issue);

                sqlx::query(
                    r#"
                    INSERT INTO identity_records (
                        id, email, phone, email_otp, phone_otp,
                        email_otp_expiration, phone_otp_expiration,
                        email_verified, phone_verified, created_at, updated_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(record.id.to_string())
                .bind(&record.email)
                .bind(&record.phone)
                .bind(&record.email_otp)
                .bind(&record.phone_otp)
                .bind(record.email_otp_expiration)
                .bind(record.phone_otp_expiration)
                .bind(record.email_verified)
                .bind(record.phone_verified)
                .bind(record.created_at)
                .bind(record.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(store_error)?;

                record
            }
        };

        tx.commit().await.map_err(store_error)?;
        Ok(record)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<IdentityRecord>, DomainError> {
        self.find_one("phone", phone).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, DomainError> {
        self.find_one("email", email).await
    }

    async fn mark_verified(
        &self,
        id: Uuid,
        channel: Channel,
        at: DateTime<Utc>,
    ) -> Result<IdentityRecord, DomainError> {
        let statement = match channel {
            Channel::Email => "UPDATE identity_records SET email_verified = TRUE, updated_at = ? WHERE id = ?",
            Channel::Sms => "UPDATE identity_records SET phone_verified = TRUE, updated_at = ? WHERE id = ?",
        };

        sqlx::query(statement)
            .bind(at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        // rows_affected is 0 for an unchanged row as well, so read back instead
        self.find_one("id", &id.to_string())
            .await?
            .ok_or(DomainError::UserNotFound)
    }
}
