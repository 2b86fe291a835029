// Publish endpoint
//
// Business rejections come back as HTTP 200 with `success: false`; only a body
// that is not a publish request is a 400.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use nema_core::{PublishRequest, PublishResponse};

use super::common::{ApiError, ErrorResponse};
use crate::app::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/publish", post(publish_eat))
        .with_state(state)
}

/// POST /api/publish - Validate, version and store a new EAT
#[utoipa::path(
    post,
    path = "/api/publish",
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Publish outcome", body = PublishResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse)
    ),
    tag = "eats"
)]
pub async fn publish_eat(
    State(state): State<AppState>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<PublishResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!("Invalid publish body: {}", rejection.body_text());
        ErrorResponse::new(format!("invalid JSON: {}", rejection.body_text()))
            .into_response(StatusCode::BAD_REQUEST)
    })?;

    Ok(Json(state.publisher.publish(req).await))
}
