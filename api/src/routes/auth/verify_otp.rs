use actix_web::{web, HttpResponse};

use otp_core::domain::value_objects::{ConfirmRequest, VerificationOutcome};
use otp_core::repositories::IdentityRepository;
use otp_core::services::verification::ChannelDispatcher;
use otp_shared::StatusResponse;

use super::AppState;
use crate::dto::VerifyOtpRequest;
use crate::handlers::domain_error_response;

const FAILURE_MESSAGE: &str = "Failed to verify OTP";

/// Handler for POST /api/auth/verify-otp
///
/// Accepts a phone pair, an email pair or both. The phone pair is checked
/// first and the first failing pair ends the request.
///
/// # Request Body
///
/// ```json
/// { "phone": "+15550100", "phoneOtp": "123456", "email": "a@x.com", "emailOtp": "654321" }
/// ```
pub async fn verify_otp<R, D>(
    state: web::Data<AppState<R, D>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    R: IdentityRepository + ?Sized + 'static,
    D: ChannelDispatcher + ?Sized + 'static,
{
    let confirm = ConfirmRequest::from(request.into_inner());

    match state.verification_service.confirm(&confirm).await {
        Ok(result) => {
            let message = match result.outcome {
                VerificationOutcome::FullyVerified => "Both Phone and Email OTPs verified successfully",
                VerificationOutcome::PartiallyVerified => "OTP(s) verified successfully",
            };
            HttpResponse::Ok().json(StatusResponse::success(message))
        }
        Err(error) => domain_error_response(&error, FAILURE_MESSAGE),
    }
}
