//! # Infrastructure Layer
//!
//! Concrete adapters for the ports defined in `otp_core`:
//!
//! - **Database**: MySQL identity store using SQLx, with migrations
//! - **Mail**: transactional email over a JSON HTTP API
//! - **SMS**: ClickSend REST client
//! - **Dispatch**: the `ChannelDispatcher` adapter combining mail and SMS
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL identity store (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Email service module - transactional mail providers
pub mod mail;

/// SMS service module - external SMS providers
pub mod sms;

/// Outgoing message templates
pub mod messages;

/// Channel dispatcher adapter for the verification engine
pub mod dispatch;

pub use dispatch::NotificationDispatcher;
pub use mail::{create_email_service, EmailService};
pub use sms::{create_sms_service, SmsService};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migration failed to apply
    #[cfg(feature = "mysql")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email provider error
    #[error("Email service error: {0}")]
    Mail(String),

    /// SMS provider error
    #[error("SMS service error: {0}")]
    Sms(String),
}
