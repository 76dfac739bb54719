use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use skeleton_core::KernelError;
use validator::ValidationErrors;

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Invalid(ValidationErrors),
    BadRequest(String),
    Internal(KernelError),
}

impl From<KernelError> for ApiError {
    fn from(error: KernelError) -> Self {
        ApiError::Internal(error)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Invalid(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found") }),
            ),
            ApiError::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "validation failed", "fields": errors }),
            ),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Internal(error) => {
                log::error!("Request failed: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
