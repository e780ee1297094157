//! Maps domain errors onto HTTP responses
//!
//! Client errors become `400 {success:false, message}` with the error's own
//! text. Server-side failures become `500 {success:false, message, error}`
//! where `message` is the route's generic failure text.

use actix_web::{error::InternalError, error::JsonPayloadError, HttpRequest, HttpResponse};

use otp_core::DomainError;
use otp_shared::StatusResponse;

/// Build the response for a failed initiate or confirm call
pub fn domain_error_response(error: &DomainError, failure_message: &str) -> HttpResponse {
    if error.is_client_error() {
        tracing::info!(error = %error, "Request rejected");
        HttpResponse::BadRequest().json(StatusResponse::failure(error.to_string()))
    } else {
        tracing::error!(error = %error, "Request failed");
        HttpResponse::InternalServerError()
            .json(StatusResponse::failure(failure_message).with_error(error.to_string()))
    }
}

/// Turns an unreadable JSON body into the usual 400 envelope
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %error, "Malformed JSON body");
    let response =
        HttpResponse::BadRequest().json(StatusResponse::failure(format!("Invalid request body: {}", error)));
    InternalError::from_response(error, response).into()
}
