//! Screening request API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use domain::{
    entities::{NewScreeningRequest, ScreeningRequest},
    value_objects::ScreeningRequestId,
};
use serde::Deserialize;
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Incoming screening request submission
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateScreeningRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "is required"))]
    pub organization: String,

    #[validate(length(min = 1, message = "is required"))]
    pub screening_type: String,

    pub event_date: Option<String>,
    pub attendee_count: Option<String>,
    pub message: Option<String>,
}

/// GET /api/screening-requests
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScreeningRequest>>, ApiError> {
    let requests = state.screening_service.list().await?;
    Ok(Json(requests))
}

/// POST /api/screening-requests
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateScreeningRequest>,
) -> Result<(StatusCode, Json<ScreeningRequest>), ApiError> {
    let submission = NewScreeningRequest::new(
        body.name,
        body.email,
        body.organization,
        body.screening_type,
        body.event_date,
        body.attendee_count,
        body.message,
    )
    .map_err(|e| ApiError::Validation(vec![e.to_string()]))?;

    let stored = state.screening_service.create(submission).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/screening-requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScreeningRequest>, ApiError> {
    let id: ScreeningRequestId = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID".to_string()))?;

    match state.screening_service.get(id).await? {
        Some(request) => Ok(Json(request)),
        None => Err(ApiError::NotFound(
            "Screening request not found".to_string(),
        )),
    }
}

/// Catch-all for unmatched API paths
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound("API route not found".to_string())
}
