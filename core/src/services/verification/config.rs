//! Configuration for the verification service

use otp_shared::config::{MergePolicy, VerificationConfig};

/// Configuration for the verification service
#[derive(Debug, Clone, Default)]
pub struct VerificationServiceConfig {
    /// Send the phone code over SMS during initiate
    pub sms_dispatch_enabled: bool,
    /// Serialize initiate calls that share an email or phone
    pub serialize_initiate: bool,
    /// How initiate resolves email and phone to a record
    pub merge_policy: MergePolicy,
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            sms_dispatch_enabled: config.sms_dispatch_enabled,
            serialize_initiate: config.serialize_initiate,
            merge_policy: config.merge_policy,
        }
    }
}
