use actix_web::{web, HttpResponse};

use otp_core::repositories::IdentityRepository;
use otp_core::services::verification::ChannelDispatcher;
use otp_shared::{mask_email, mask_phone, StatusResponse};

use super::AppState;
use crate::dto::SendOtpRequest;
use crate::handlers::domain_error_response;

const FAILURE_MESSAGE: &str = "Failed to send OTP";

/// Handler for POST /api/auth/send-otp
///
/// Issues a fresh email and phone code for the identity and delivers them.
///
/// # Request Body
///
/// ```json
/// { "email": "a@x.com", "phone": "+15550100" }
/// ```
///
/// # Responses
///
/// - `200` with `"OTP sent to email {email} and phone {phone}"`
/// - `400` with `"Missing phone/email"` or an identity conflict
/// - `500` with `"Failed to send OTP"` when the store or a provider fails
pub async fn send_otp<R, D>(
    state: web::Data<AppState<R, D>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    R: IdentityRepository + ?Sized + 'static,
    D: ChannelDispatcher + ?Sized + 'static,
{
    let SendOtpRequest { email, phone } = request.into_inner();
    let email = email.unwrap_or_default();
    let phone = phone.unwrap_or_default();

    tracing::debug!(
        email = %mask_email(&email),
        phone = %mask_phone(&phone),
        "Processing send-otp request"
    );

    match state.verification_service.initiate(&email, &phone).await {
        Ok(_) => HttpResponse::Ok().json(StatusResponse::success(format!(
            "OTP sent to email {} and phone {}",
            email, phone
        ))),
        Err(error) => domain_error_response(&error, FAILURE_MESSAGE),
    }
}
