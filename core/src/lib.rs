//! # OTP Core
//!
//! Domain layer of the OTP gateway: the identity record, the code generator,
//! the store and dispatcher interfaces, and the verification engine that
//! drives the initiate and confirm flows.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
