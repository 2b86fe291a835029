// Recent event listing

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::{internal_error, ApiError, ErrorResponse};
use super::validation::{non_empty, parse_days};
use crate::app::AppState;
use crate::services::EVENT_WINDOW_DAYS;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Listing window in days, 1-90 (default: 7)
    pub days: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/events", get(list_events))
        .with_state(state)
}

/// GET /api/events - Distinct event titles, most recent event first
#[utoipa::path(
    get,
    path = "/api/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Distinct event titles", body = Vec<String>),
        (status = 400, description = "Invalid days parameter", body = ErrorResponse),
        (status = 500, description = "Content store error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let days = match non_empty(query.days) {
        Some(raw) => parse_days(&raw)?,
        None => EVENT_WINDOW_DAYS,
    };

    let events = state
        .eats
        .list_distinct_events(days)
        .await
        .map_err(|e| internal_error("Failed to list events", e))?;

    Ok(Json(events))
}
