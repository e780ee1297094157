//! OTP flow configuration

use serde::{Deserialize, Serialize};

use super::{env_flag, env_or, ConfigError};

/// How an initiate request resolves its email and phone to a stored identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Update whichever record matches the email or the phone
    #[default]
    MatchEither,
    /// Refuse when email and phone do not resolve to the same record (or both to none)
    RequireConsistent,
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "match_either" | "either" => Ok(MergePolicy::MatchEither),
            "require_consistent" | "consistent" | "strict" => Ok(MergePolicy::RequireConsistent),
            _ => Err(format!("Invalid merge policy: {}", s)),
        }
    }
}

/// OTP flow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Send the phone code over SMS during initiate
    #[serde(default)]
    pub sms_dispatch_enabled: bool,

    /// Serialize concurrent initiate calls for the same email/phone
    #[serde(default)]
    pub serialize_initiate: bool,

    /// Identity resolution rule for initiate
    #[serde(default)]
    pub merge_policy: MergePolicy,

    /// Product name used in outgoing messages
    pub brand_name: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            sms_dispatch_enabled: false,
            serialize_initiate: false,
            merge_policy: MergePolicy::MatchEither,
            brand_name: String::from("OTP Gateway"),
        }
    }
}

impl VerificationConfig {
    /// Create from `OTP_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let merge_policy = match std::env::var("OTP_MERGE_POLICY") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OTP_MERGE_POLICY".to_string(),
                value: raw,
            })?,
            Err(_) => defaults.merge_policy,
        };

        Ok(Self {
            sms_dispatch_enabled: env_flag("OTP_SMS_DISPATCH_ENABLED", defaults.sms_dispatch_enabled)?,
            serialize_initiate: env_flag("OTP_SERIALIZE_INITIATE", defaults.serialize_initiate)?,
            merge_policy,
            brand_name: env_or("OTP_BRAND_NAME", &defaults.brand_name),
        })
    }
}
