//! Screening request identifier value object

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored screening request
///
/// Ids are assigned by the storage layer and are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreeningRequestId(i64);

impl ScreeningRequestId {
    /// Create a new id, rejecting non-positive values
    pub fn new(id: i64) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::InvalidScreeningRequestId(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Get the raw numeric value
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ScreeningRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScreeningRequestId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .parse()
            .map_err(|_| DomainError::InvalidScreeningRequestId(s.to_string()))?;
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_id_is_accepted() {
        let id = ScreeningRequestId::new(42).unwrap();
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn zero_is_rejected() {
        assert!(ScreeningRequestId::new(0).is_err());
    }

    #[test]
    fn negative_is_rejected() {
        assert!(ScreeningRequestId::new(-3).is_err());
    }

    #[test]
    fn parses_from_decimal_string() {
        let id: ScreeningRequestId = "17".parse().unwrap();
        assert_eq!(id.value(), 17);
    }

    #[test]
    fn non_numeric_string_is_rejected() {
        assert!("abc".parse::<ScreeningRequestId>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let id = ScreeningRequestId::new(7).unwrap();
        assert_eq!(id.to_string(), "7");
    }
}
