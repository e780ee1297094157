//! OTP route handlers
//!
//! - `send-otp` issues and delivers a fresh code pair
//! - `verify-otp` checks one or both submitted codes

pub mod send_otp;
pub mod verify_otp;

use std::sync::Arc;

use otp_core::repositories::IdentityRepository;
use otp_core::services::verification::{ChannelDispatcher, OtpVerificationService};

/// Application state that holds shared services
pub struct AppState<R, D>
where
    R: IdentityRepository + ?Sized,
    D: ChannelDispatcher + ?Sized,
{
    pub verification_service: Arc<OtpVerificationService<R, D>>,
}

impl<R, D> AppState<R, D>
where
    R: IdentityRepository + ?Sized,
    D: ChannelDispatcher + ?Sized,
{
    pub fn new(verification_service: Arc<OtpVerificationService<R, D>>) -> Self {
        Self { verification_service }
    }
}
