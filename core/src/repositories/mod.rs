//! Persistence ports of the domain layer.

pub mod identity;

pub use identity::{IdentityRepository, InMemoryIdentityRepository};
