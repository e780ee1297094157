//! Application factory
//!
//! Builds the Actix-web `App` around a prepared `AppState`. Middleware that
//! depends on deployment settings (CORS, request tracing) is wrapped by the
//! binary so tests can serve the bare routes.

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};

use otp_core::repositories::IdentityRepository;
use otp_core::services::verification::ChannelDispatcher;

use crate::handlers::json_error_handler;
use crate::routes::auth::{send_otp::send_otp, verify_otp::verify_otp, AppState};
use crate::routes::health::{health_check, not_found};

/// Create and configure the application with all dependencies
pub fn create_app<R, D>(
    app_state: web::Data<AppState<R, D>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
>
where
    R: IdentityRepository + ?Sized + 'static,
    D: ChannelDispatcher + ?Sized + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/auth")
                .route("/send-otp", web::post().to(send_otp::<R, D>))
                .route("/verify-otp", web::post().to(verify_otp::<R, D>)),
        )
        .default_service(web::route().to(not_found))
}
