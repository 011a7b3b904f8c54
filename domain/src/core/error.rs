//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Roster must not be empty")]
    EmptyRoster,

    #[error("{0} is not a member of this session's roster")]
    NotAMember(String),

    #[error("Session is already decided")]
    AlreadyDecided,

    #[error("Invalid response value: {0}. Valid: accept, decline")]
    InvalidResponseValue(String),
}

impl DomainError {
    /// Check if this error indicates bad caller input rather than a
    /// state conflict
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyRoster
                | DomainError::NotAMember(_)
                | DomainError::InvalidResponseValue(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_member_display() {
        let error = DomainError::NotAMember("x@y.com".to_string());
        assert_eq!(error.to_string(), "x@y.com is not a member of this session's roster");
    }

    #[test]
    fn test_is_validation_check() {
        assert!(DomainError::EmptyRoster.is_validation());
        assert!(DomainError::NotAMember("a".to_string()).is_validation());
        assert!(!DomainError::AlreadyDecided.is_validation());
    }
}
