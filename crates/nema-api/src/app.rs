// Router assembly
//
// Everything the handlers share lives in AppState and is built once at
// startup; there are no globals. `build_app` is what the binary serves and
// what the router tests drive in-process.

use axum::{routing::get, Json, Router};
use nema_core::{EatNotifier, EatRenderer, EatStore};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::pages::Templates;
use crate::services::{EatService, PublishService};
use crate::{api, pages};

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub eats: Arc<EatService>,
    pub publisher: Arc<PublishService>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EatStore>,
        renderer: Arc<dyn EatRenderer>,
        notifier: Option<Arc<dyn EatNotifier>>,
        templates: Arc<Templates>,
    ) -> Self {
        Self {
            eats: Arc::new(EatService::new(store.clone())),
            publisher: Arc::new(PublishService::new(store, renderer, notifier)),
            templates,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /soh/up - Liveness
async fn up() -> &'static str {
    "ok"
}

/// GET /soh - Health with build version
async fn soh() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full router. Unmatched paths fall through to axum's 404.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/soh/up", get(up))
        .route("/soh", get(soh))
        .merge(api::routes(state.clone()))
        .merge(pages::routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
}
