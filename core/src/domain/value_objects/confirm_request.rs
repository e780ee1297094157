//! Confirm input with its optional identifier/code pairs made explicit

use super::channel::Channel;

/// One submitted (identifier, code) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelProof {
    /// Phone number or email address
    pub identifier: String,
    /// Submitted code
    pub code: String,
}

impl ChannelProof {
    pub fn new(identifier: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            code: code.into(),
        }
    }
}

/// Which channels a confirm call carries proofs for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    PhoneOnly(ChannelProof),
    EmailOnly(ChannelProof),
    Both { phone: ChannelProof, email: ChannelProof },
    Neither,
}

impl ConfirmRequest {
    /// Builds the request from raw optional fields
    ///
    /// A pair counts only when both its identifier and its code are present
    /// and non-empty. A lone identifier or a lone code is ignored.
    pub fn from_parts(
        phone: Option<String>,
        phone_otp: Option<String>,
        email: Option<String>,
        email_otp: Option<String>,
    ) -> Self {
        let phone = pair(phone, phone_otp);
        let email = pair(email, email_otp);

        match (phone, email) {
            (Some(phone), Some(email)) => ConfirmRequest::Both { phone, email },
            (Some(phone), None) => ConfirmRequest::PhoneOnly(phone),
            (None, Some(email)) => ConfirmRequest::EmailOnly(email),
            (None, None) => ConfirmRequest::Neither,
        }
    }

    /// Proofs in evaluation order, phone first
    pub fn proofs(&self) -> Vec<(Channel, &ChannelProof)> {
        match self {
            ConfirmRequest::PhoneOnly(phone) => vec![(Channel::Sms, phone)],
            ConfirmRequest::EmailOnly(email) => vec![(Channel::Email, email)],
            ConfirmRequest::Both { phone, email } => {
                vec![(Channel::Sms, phone), (Channel::Email, email)]
            }
            ConfirmRequest::Neither => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ConfirmRequest::Neither)
    }
}

fn pair(identifier: Option<String>, code: Option<String>) -> Option<ChannelProof> {
    match (identifier, code) {
        (Some(identifier), Some(code)) if !identifier.is_empty() && !code.is_empty() => {
            Some(ChannelProof { identifier, code })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_both_pairs() {
        let request = ConfirmRequest::from_parts(some("555"), some("111111"), some("a@x.com"), some("222222"));
        let proofs = request.proofs();

        assert_eq!(proofs.len(), 2);
        assert_eq!(proofs[0].0, Channel::Sms);
        assert_eq!(proofs[1].0, Channel::Email);
    }

    #[test]
    fn test_incomplete_pairs_are_dropped() {
        let request = ConfirmRequest::from_parts(some("555"), None, some("a@x.com"), some("222222"));
        assert_eq!(request, ConfirmRequest::EmailOnly(ChannelProof::new("a@x.com", "222222")));

        let request = ConfirmRequest::from_parts(some("555"), some(""), None, some("222222"));
        assert!(request.is_empty());
    }

    #[test]
    fn test_phone_only() {
        let request = ConfirmRequest::from_parts(some("555"), some("111111"), None, None);
        assert_eq!(request, ConfirmRequest::PhoneOnly(ChannelProof::new("555", "111111")));
    }
}
