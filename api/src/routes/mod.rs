//! Route handlers grouped by API scope

pub mod auth;
pub mod health;
