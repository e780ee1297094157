//! Request bodies accepted by the API

pub mod otp;

pub use otp::{SendOtpRequest, VerifyOtpRequest};
