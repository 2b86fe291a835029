// Attachment upload
//
// Forwards the multipart `file` field to the content store's file manager and
// returns the stored file reference, which the editor later sends back as an
// attachment of a publish request.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use nema_core::EatFile;
use utoipa::ToSchema;

use super::common::{internal_error, ApiError, ErrorResponse};
use crate::app::AppState;

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024; // 32 MB

/// Name used when the client sends no file name
const DEFAULT_FILENAME: &str = "upload";

/// Multipart form accepted by `/api/upload`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// POST /api/upload - Store an attachment
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored file", body = EatFile),
        (status = 400, description = "Missing or unreadable file field", body = ErrorResponse),
        (status = 500, description = "Content store error", body = ErrorResponse)
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EatFile>, ApiError> {
    let bad_request =
        |msg: String| ErrorResponse::new(msg).into_response(StatusCode::BAD_REQUEST);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let data = field.bytes().await.map_err(|e| bad_request(e.body_text()))?;

        tracing::info!(filename = %filename, size = data.len(), "Uploading attachment");
        let file = state
            .eats
            .upload(&filename, data.to_vec())
            .await
            .map_err(|e| internal_error("Failed to upload file", e))?;

        return Ok(Json(file));
    }

    Err(bad_request("file field is required".to_string()))
}
