//! Business services containing domain logic and use cases.

pub mod verification;

pub use verification::{
    ChannelDispatcher, Clock, CodeGenerator, ManualClock, OtpVerificationService, SystemClock,
    VerificationServiceConfig, OTP_CODE_LENGTH, OTP_VALIDITY_MINUTES,
};
