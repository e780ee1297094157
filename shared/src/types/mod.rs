//! Wire types shared by the API and its tests

pub mod response;

pub use response::StatusResponse;
