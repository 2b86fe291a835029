// Single EAT lookup

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use nema_core::Eat;
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::{internal_error, ApiError, ErrorResponse};
use super::validation::{non_empty, parse_id};
use crate::app::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EatQuery {
    /// Record id; takes precedence over `event_title`
    pub id: Option<String>,
    /// Event title; resolves to its latest version
    pub event_title: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/eat", get(get_eat))
        .with_state(state)
}

/// GET /api/eat - Fetch a record by id, or the latest version of an event
#[utoipa::path(
    get,
    path = "/api/eat",
    params(EatQuery),
    responses(
        (status = 200, description = "EAT found", body = Eat),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "EAT not found", body = ErrorResponse),
        (status = 500, description = "Content store error", body = ErrorResponse)
    ),
    tag = "eats"
)]
pub async fn get_eat(
    State(state): State<AppState>,
    Query(query): Query<EatQuery>,
) -> Result<Json<Eat>, ApiError> {
    let result = match (non_empty(query.id), non_empty(query.event_title)) {
        (Some(raw), _) => {
            let id = parse_id(&raw)?;
            state.eats.get(id).await
        }
        (None, Some(title)) => state.eats.latest(&title).await,
        (None, None) => {
            return Err(ErrorResponse::new("id or event_title required")
                .into_response(StatusCode::BAD_REQUEST))
        }
    };

    let eat = result
        .map_err(|e| internal_error("Failed to get EAT", e))?
        .ok_or_else(|| ErrorResponse::new("EAT not found").into_response(StatusCode::NOT_FOUND))?;

    Ok(Json(eat))
}
