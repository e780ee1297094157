//! Verification service module for dual-channel one-time codes
//!
//! This module provides the whole OTP lifecycle:
//! - Code generation with a shared five-minute expiration
//! - Upsert of the identity record keyed by email or phone
//! - Email and SMS delivery through the `ChannelDispatcher` port
//! - Independent confirmation of each channel

mod clock;
mod config;
mod generator;
mod identity_lock;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VerificationServiceConfig;
pub use generator::{CodeGenerator, OTP_CODE_LENGTH, OTP_CODE_MAX, OTP_CODE_MIN, OTP_VALIDITY_MINUTES};
pub use identity_lock::{IdentityGuard, IdentityLocks};
pub use service::OtpVerificationService;
pub use traits::ChannelDispatcher;
