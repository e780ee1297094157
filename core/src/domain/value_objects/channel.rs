//! Delivery channel of a one-time code

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel a code is delivered over and verified against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Transactional email
    Email,
    /// Text message to the phone number
    Sms,
}

impl Channel {
    /// Name of the identifier bound to this channel, as used in client-facing messages
    pub fn identifier_label(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "phone",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Sms => write!(f, "sms"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Channel::Sms.identifier_label(), "phone");
        assert_eq!(Channel::Email.identifier_label(), "email");
        assert_eq!(Channel::Sms.to_string(), "sms");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Channel::Email).unwrap(), "\"email\"");
        let channel: Channel = serde_json::from_str("\"sms\"").unwrap();
        assert_eq!(channel, Channel::Sms);
    }
}
