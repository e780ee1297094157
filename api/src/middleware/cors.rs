//! CORS middleware configuration for cross-origin requests.
//!
//! Any origin is accepted unless `ALLOWED_ORIGINS` names a list.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use otp_shared::CorsConfig;

/// Creates a CORS middleware instance from configuration
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(config.max_age);

    if config.is_permissive() {
        tracing::info!("Configuring permissive CORS");
        return cors.allow_any_origin();
    }

    tracing::info!(origins = ?config.allowed_origins, "Configuring CORS allow-list");
    config
        .allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
