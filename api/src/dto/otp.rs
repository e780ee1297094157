//! OTP request DTOs
//!
//! Every field is optional at the wire level; absence is turned into the
//! domain's missing-identifier error rather than a deserialization failure.

use serde::{Deserialize, Serialize};

use otp_core::ConfirmRequest;

/// Body of `POST /api/auth/send-otp`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `POST /api/auth/verify-otp`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_otp: Option<String>,
    #[serde(default)]
    pub email_otp: Option<String>,
}

impl From<VerifyOtpRequest> for ConfirmRequest {
    fn from(request: VerifyOtpRequest) -> Self {
        ConfirmRequest::from_parts(request.phone, request.phone_otp, request.email, request.email_otp)
    }
}
