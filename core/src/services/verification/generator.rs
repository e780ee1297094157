//! One-time code generation

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};

/// Number of digits in a code
pub const OTP_CODE_LENGTH: usize = 6;

/// Smallest code ever issued
pub const OTP_CODE_MIN: u32 = 100_000;

/// Largest code ever issued
pub const OTP_CODE_MAX: u32 = 999_999;

/// Validity window shared by both channels
pub const OTP_VALIDITY_MINUTES: i64 = 5;

/// Produces codes and their expiration instants
pub struct CodeGenerator;

impl CodeGenerator {
    /// Six-digit code drawn uniformly from the OS random source; never has a leading zero
    pub fn generate_code() -> String {
        OsRng.gen_range(OTP_CODE_MIN..=OTP_CODE_MAX).to_string()
    }

    /// Expiration instant for codes issued at `now`
    pub fn expiration_from(now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(OTP_VALIDITY_MINUTES)
    }
}
