//! Email address value object

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

/// A validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address, validating the format
    pub fn new(email: impl Into<String>) -> Result<Self, DomainError> {
        let email = email.into();
        let trimmed = email.trim();

        if !trimmed.validate_email() {
            return Err(DomainError::InvalidEmailAddress(email));
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Get the email address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
