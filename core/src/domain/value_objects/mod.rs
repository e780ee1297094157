//! Value objects exchanged with the verification engine.

pub mod channel;
pub mod confirm_request;
pub mod outcome;

pub use channel::Channel;
pub use confirm_request::{ChannelProof, ConfirmRequest};
pub use outcome::{ConfirmResult, InitiateResult, VerificationOutcome};
