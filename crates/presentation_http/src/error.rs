//! API error handling
//!
//! Maps layered errors onto the fixed JSON wire shapes the frontend
//! expects. Every body carries a `message` field; validation failures add
//! an `errors` list and internal errors add a timestamp.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid request data")]
    Validation(Vec<String>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Plain `{message}` error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub message: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,

    /// Time of failure, only set for internal errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ErrorResponse {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
            timestamp: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::message(msg)),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: "Invalid request data".to_string(),
                    errors: Some(errors),
                    timestamp: None,
                },
            ),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::message(msg)),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::message(msg)),
            Self::Internal(msg) => {
                // Log the cause, never send it to the client
                error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "Internal Server Error".to_string(),
                        errors: None,
                        timestamp: Some(Utc::now().to_rfc3339()),
                    },
                )
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}
