//! Domain error taxonomy for the OTP lifecycle.

use thiserror::Error;

use crate::domain::value_objects::Channel;

/// Errors raised by the verification engine and its ports
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required identifier was absent or empty
    #[error("Missing {field}")]
    MissingIdentifier { field: String },

    /// The submitted code differs from the stored one or has expired
    #[error("Invalid or expired {} OTP", .channel.identifier_label())]
    InvalidOrExpiredOtp { channel: Channel },

    #[error("User not found")]
    UserNotFound,

    /// The email and phone resolve to records that cannot be merged
    #[error("{message}")]
    IdentityConflict { message: String },

    #[error("Failed to send {channel} message: {message}")]
    DispatchFailure { channel: Channel, message: String },

    #[error("Identity store unavailable: {message}")]
    StoreUnavailable { message: String },
}

impl DomainError {
    /// Whether the caller can fix the request; everything else is a server-side failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::MissingIdentifier { .. }
                | DomainError::InvalidOrExpiredOtp { .. }
                | DomainError::UserNotFound
                | DomainError::IdentityConflict { .. }
        )
    }

    pub fn missing_identifiers() -> Self {
        DomainError::MissingIdentifier {
            field: "phone/email".to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(DomainError::missing_identifiers().to_string(), "Missing phone/email");
        assert_eq!(
            DomainError::InvalidOrExpiredOtp { channel: Channel::Sms }.to_string(),
            "Invalid or expired phone OTP"
        );
        assert_eq!(
            DomainError::InvalidOrExpiredOtp { channel: Channel::Email }.to_string(),
            "Invalid or expired email OTP"
        );
        assert_eq!(DomainError::UserNotFound.to_string(), "User not found");
    }

    #[test]
    fn test_client_errors() {
        assert!(DomainError::UserNotFound.is_client_error());
        assert!(!DomainError::StoreUnavailable {
            message: "down".to_string()
        }
        .is_client_error());
        assert!(!DomainError::DispatchFailure {
            channel: Channel::Email,
            message: "timeout".to_string()
        }
        .is_client_error());
    }
}
