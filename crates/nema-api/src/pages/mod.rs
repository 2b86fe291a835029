// HTML pages
//
// Every page gets a fresh CSP nonce; inline scripts in the templates carry it
// and the Content-Security-Policy header only allows scripts with that nonce.

pub mod dashboard;
pub mod editor;
pub mod templates;

pub use templates::{TemplateError, Templates};

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use nema_core::StoreError;
use rand::RngCore;
use thiserror::Error;

use crate::api::validation::QueryError;
use crate::app::AppState;

/// Bytes of randomness per nonce
const NONCE_BYTES: usize = 16;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/gha-portal", get(editor::editor_page))
        .route("/gha-portal/preview", post(editor::preview_page))
        .route("/dashboard", get(dashboard::dashboard_page))
        .with_state(state)
}

/// Random base64 nonce for one response
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

/// Policy allowing same-origin resources and inline scripts carrying `nonce`
pub fn content_security_policy(nonce: &str) -> String {
    format!(
        "default-src 'self'; script-src 'self' 'nonce-{nonce}'; style-src 'self' 'unsafe-inline'; \
         img-src 'self' data: https:; frame-src https:; object-src 'none'; base-uri 'self'; \
         frame-ancestors 'none'"
    )
}

/// HTML response with the CSP header for `nonce`
pub fn html_page(nonce: &str, body: String) -> Response {
    (
        [(header::CONTENT_SECURITY_POLICY, content_security_policy(nonce))],
        Html(body),
    )
        .into_response()
}

/// Page handler failures, rendered as plain text
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    BadRequest(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = match &self {
            PageError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PageError::Store(_) | PageError::Template(_) => {
                tracing::error!("Page failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_is_random_base64() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_ne!(a, b);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), NONCE_BYTES);
    }

    #[test]
    fn test_csp_contains_nonce() {
        let csp = content_security_policy("abc");
        assert!(csp.contains("script-src 'self' 'nonce-abc'"));
        assert!(csp.starts_with("default-src 'self'"));
    }

    #[test]
    fn test_page_error_status() {
        let response =
            PageError::from(QueryError("invalid version: 0".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = PageError::from(StoreError::transport("down")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
