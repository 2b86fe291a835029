// HTTP API routes
//
// JSON endpoints called by the editor page. They are the portal's own API;
// each one reaches the content store through the services layer.

pub mod common;
pub mod eats;
pub mod events;
pub mod publish;
pub mod upload;
pub mod validation;

// Re-export common types
pub use common::ErrorResponse;

use axum::Router;

use crate::app::AppState;

/// All JSON API routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(events::routes(state.clone()))
        .merge(eats::routes(state.clone()))
        .merge(publish::routes(state.clone()))
        .merge(upload::routes(state))
}
