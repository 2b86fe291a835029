// Public read-only dashboard

use axum::{
    extract::{Query, State},
    response::Response,
};
use minijinja::context;
use serde::Deserialize;

use super::{generate_nonce, html_page, PageError};
use crate::api::validation::{non_empty, parse_version};
use crate::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub event_title: Option<String>,
    pub version: Option<String>,
}

/// GET /dashboard - Current advisory and its version history
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, PageError> {
    let version = non_empty(query.version)
        .map(|raw| parse_version(&raw))
        .transpose()?;
    let event_title = non_empty(query.event_title);

    let nonce = generate_nonce();
    let view = state
        .eats
        .load_dashboard(event_title.as_deref(), version)
        .await?;

    let html = state.templates.render(
        "dashboard.html",
        context! {
            nonce => &nonce,
            current => view.current,
            versions => view.versions,
        },
    )?;
    Ok(html_page(&nonce, html))
}
