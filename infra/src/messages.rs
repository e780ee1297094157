//! Text of the messages carrying a code

use otp_core::OTP_VALIDITY_MINUTES;

/// Subject line of the verification email
pub const EMAIL_SUBJECT: &str = "Your Email OTP Code";

/// Body shared by the email and the SMS
pub fn verification_message(brand_name: &str, code: &str) -> String {
    format!(
        "Your OTP code for verifying your {} account is {}. This code is valid for the next {} minutes. Please use it to complete your verification process.",
        brand_name, code, OTP_VALIDITY_MINUTES
    )
}
