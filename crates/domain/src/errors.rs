//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),

    /// Invalid screening request identifier
    #[error("Invalid screening request id: {0}")]
    InvalidScreeningRequestId(String),

    /// A required field is missing or empty
    #[error("Validation failed: {field}: {reason}")]
    ValidationError { field: String, reason: String },
}

impl DomainError {
    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_creates_correct_error() {
        let err = DomainError::validation("email", "is required");
        match err {
            DomainError::ValidationError { field, reason } => {
                assert_eq!(field, "email");
                assert_eq!(reason, "is required");
            },
            _ => unreachable!("Expected ValidationError"),
        }
    }

    #[test]
    fn validation_error_message_names_the_field() {
        let err = DomainError::validation("organization", "is required");
        assert_eq!(
            err.to_string(),
            "Validation failed: organization: is required"
        );
    }

    #[test]
    fn invalid_email_error_message() {
        let err = DomainError::InvalidEmailAddress("bad-email".to_string());
        assert_eq!(err.to_string(), "Invalid email address: bad-email");
    }

    #[test]
    fn invalid_id_error_message() {
        let err = DomainError::InvalidScreeningRequestId("abc".to_string());
        assert_eq!(err.to_string(), "Invalid screening request id: abc");
    }
}
