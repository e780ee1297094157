//! Shared configuration, wire types and helpers for the OTP gateway
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The `{ success, message, error }` response envelope
//! - Identifier masking for logs

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig,
    MailConfig, MergePolicy, ServerConfig, SmsConfig, StoreBackend, VerificationConfig,
};
pub use types::StatusResponse;
pub use utils::masking::{mask_email, mask_phone};
