//! HTTP surface of the OTP gateway
//!
//! Exposed as a library so integration tests can build the same `App` the
//! binary serves.

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::auth::AppState;
