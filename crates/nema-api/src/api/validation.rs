// Query parameter validation
//
// Shared by the JSON API and the HTML pages. Values arrive as raw strings so
// the messages below, not serde's, reach the client.

use super::common::ErrorResponse;
use axum::http::StatusCode;
use axum::Json;
use thiserror::Error;

/// Largest listing window accepted by `/api/events`
pub const MAX_EVENT_DAYS: i64 = 90;

/// Invalid query parameter; always a 400
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct QueryError(pub String);

impl From<QueryError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: QueryError) -> Self {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.0)))
    }
}

/// Treat an empty parameter as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Record id
pub fn parse_id(raw: &str) -> Result<i64, QueryError> {
    raw.parse()
        .map_err(|_| QueryError(format!("invalid id: {}", raw)))
}

/// Listing window in days, 1 to 90
pub fn parse_days(raw: &str) -> Result<i64, QueryError> {
    match raw.parse::<i64>() {
        Ok(days) if (1..=MAX_EVENT_DAYS).contains(&days) => Ok(days),
        _ => Err(QueryError(format!("invalid days: {} (must be 1-90)", raw))),
    }
}

/// Version number, at least 1
pub fn parse_version(raw: &str) -> Result<u32, QueryError> {
    match raw.parse::<u32>() {
        Ok(version) if version >= 1 => Ok(version),
        _ => Err(QueryError(format!("invalid version: {}", raw))),
    }
}
