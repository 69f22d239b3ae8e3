//! Request validation
//!
//! Provides a `ValidatedJson` extractor that validates request bodies using
//! the validator crate and rejects failures with the fixed
//! `{message: "Invalid request data", errors: [...]}` shape.

use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// A JSON extractor that also validates the request body
///
/// Use this instead of `Json<T>` when the body must satisfy the `validator`
/// constraints declared on `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(vec![e.body_text()]).into_response())?;

        value.validate().map_err(|e| {
            let errors: Vec<String> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors
                        .iter()
                        .map(|error| {
                            format!(
                                "{}: {}",
                                field,
                                error
                                    .message
                                    .as_ref()
                                    .map_or_else(|| error.code.to_string(), ToString::to_string)
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .collect();

            ApiError::Validation(errors).into_response()
        })?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(length(min = 1, message = "is required"))]
        name: String,
        #[validate(email(message = "must be a valid email"))]
        email: String,
    }

    async fn test_handler(ValidatedJson(req): ValidatedJson<TestRequest>) -> String {
        req.name
    }

    fn create_test_app() -> Router {
        Router::new().route("/test", post(test_handler))
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let app = create_test_app();
        let response = app
            .oneshot(json_request(
                r#"{"name":"Maria","email":"maria@festival.org"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn failing_field_is_named_in_errors() {
        let app = create_test_app();
        let response = app
            .oneshot(json_request(r#"{"name":"Maria","email":"not-an-email"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Invalid request data");
        let errors = json["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| {
            e.as_str()
                .is_some_and(|s| s.contains("email"))
        }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_failure() {
        let app = create_test_app();
        let response = app.oneshot(json_request("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Invalid request data");
    }
}
