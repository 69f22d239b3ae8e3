//! Screening request entity

use crate::errors::DomainError;
use crate::value_objects::{EmailAddress, ScreeningRequestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored screening request
///
/// Submitted through the public site by festivals, schools, and community
/// groups asking to host a screening of the film. Immutable once created;
/// the id and creation timestamp are assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningRequest {
    pub id: ScreeningRequestId,
    pub name: String,
    pub email: EmailAddress,
    pub organization: String,
    pub screening_type: String,
    pub event_date: Option<String>,
    pub attendee_count: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated screening request submission, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScreeningRequest {
    pub name: String,
    pub email: EmailAddress,
    pub organization: String,
    pub screening_type: String,
    pub event_date: Option<String>,
    pub attendee_count: Option<String>,
    pub message: Option<String>,
}

impl NewScreeningRequest {
    /// Build a new submission from raw field values
    ///
    /// Required fields are trimmed and must be non-empty; the email is
    /// format-checked. Optional fields are trimmed and dropped when empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        organization: impl Into<String>,
        screening_type: impl Into<String>,
        event_date: Option<String>,
        attendee_count: Option<String>,
        message: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = required_field("name", name.into())?;
        let email = EmailAddress::new(email.into())?;
        let organization = required_field("organization", organization.into())?;
        let screening_type = required_field("screeningType", screening_type.into())?;

        Ok(Self {
            name,
            email,
            organization,
            screening_type,
            event_date: optional_field(event_date),
            attendee_count: optional_field(attendee_count),
            message: optional_field(message),
        })
    }
}

fn required_field(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
