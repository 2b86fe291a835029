// Common DTOs for the JSON API

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Error tuple returned by JSON handlers
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// 500 response for a failed store call, logged with `context`
pub fn internal_error(context: &str, err: impl std::fmt::Display) -> ApiError {
    tracing::error!("{}: {}", context, err);
    ErrorResponse::new(err.to_string()).into_response(StatusCode::INTERNAL_SERVER_ERROR)
}
