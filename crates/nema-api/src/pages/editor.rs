// EAT editor and preview pages

use axum::{extract::State, response::Response, Form};
use chrono::Utc;
use minijinja::context;
use nema_core::publish::parse_event_date;
use nema_core::{format_event_title, Eat, EatFile, EatStatus};
use serde::Deserialize;

use super::{generate_nonce, html_page, PageError};
use crate::app::AppState;
use crate::services::EVENT_WINDOW_DAYS;

/// GET /gha-portal - Editor with the recent events dropdown
pub async fn editor_page(State(state): State<AppState>) -> Result<Response, PageError> {
    let nonce = generate_nonce();

    // The dropdown is a convenience; the editor still works without it
    let events = match state.eats.list_distinct_events(EVENT_WINDOW_DAYS).await {
        Ok(events) => events,
        Err(e) => {
            tracing::warn!("Failed to load recent events for editor: {}", e);
            Vec::new()
        }
    };

    // Event date defaults to the current UTC time
    let now = Utc::now().to_rfc3339();
    let html = state.templates.render(
        "editor.html",
        context! { nonce => &nonce, events => events, now => now },
    )?;
    Ok(html_page(&nonce, html))
}

/// Editor form as posted for preview. Checkboxes are present only when ticked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewForm {
    pub location: String,
    pub event_date: String,
    pub magnitude: String,
    pub earthquake_url: String,
    pub event_comments: String,
    pub beach_marine_threat: Option<String>,
    pub land_threat: Option<String>,
    pub status: String,
    pub tep_activated: Option<String>,
    /// JSON array of files returned by `/api/upload`
    pub uploaded_files: String,
}

impl PreviewForm {
    /// Unsaved record for display. Unparsable values fall back to defaults
    /// instead of failing the preview.
    pub fn into_eat(self) -> Eat {
        let magnitude = self.magnitude.trim().parse().unwrap_or(0.0);
        let event_date = parse_event_date(&self.event_date).unwrap_or_default();
        let attachments: Vec<EatFile> = if self.uploaded_files.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&self.uploaded_files).unwrap_or_default()
        };

        Eat {
            id: None,
            event_title: format_event_title(magnitude, &self.location, event_date),
            location: self.location,
            event_date,
            magnitude,
            earthquake_url: self.earthquake_url,
            version: 0,
            event_comments: self.event_comments,
            beach_marine_threat: is_checked(&self.beach_marine_threat),
            land_threat: is_checked(&self.land_threat),
            status: self.status.parse().unwrap_or(EatStatus::Preliminary),
            tep_activated: is_checked(&self.tep_activated),
            attachments,
            created_at: None,
            updated_at: None,
        }
    }
}

fn is_checked(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

/// POST /gha-portal/preview - Render the form as the dashboard would show it
pub async fn preview_page(
    State(state): State<AppState>,
    Form(form): Form<PreviewForm>,
) -> Result<Response, PageError> {
    let nonce = generate_nonce();
    let eat = form.into_eat();

    let html = state.templates.render(
        "preview.html",
        context! { nonce => &nonce, current => eat },
    )?;
    Ok(html_page(&nonce, html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_preview_form_into_eat() {
        let form = PreviewForm {
            location: "Napier".to_string(),
            event_date: "2026-02-01T08:15".to_string(),
            magnitude: "6.2".to_string(),
            status: "confirmed".to_string(),
            land_threat: Some("on".to_string()),
            uploaded_files: r#"[{"id":4,"name":"map.png","path":"files/map.png","size":3,"type":"image/png"}]"#
                .to_string(),
            ..Default::default()
        };

        let eat = form.into_eat();
        assert_eq!(eat.event_title, "M6.2-Napier-2026-02-01");
        assert!(eat.land_threat);
        assert!(!eat.beach_marine_threat);
        assert_eq!(eat.status, EatStatus::Confirmed);
        assert_eq!(eat.attachments.len(), 1);
        assert!(eat.attachments[0].is_image());
    }

    #[test]
    fn test_preview_form_tolerates_bad_values() {
        let form = PreviewForm {
            location: "Napier".to_string(),
            event_date: "yesterday".to_string(),
            magnitude: "big".to_string(),
            status: "urgent".to_string(),
            uploaded_files: "not json".to_string(),
            ..Default::default()
        };

        let eat = form.into_eat();
        assert_eq!(eat.magnitude, 0.0);
        assert_eq!(eat.event_date, DateTime::<Utc>::default());
        assert_eq!(eat.status, EatStatus::Preliminary);
        assert!(eat.attachments.is_empty());
        assert_eq!(eat.event_title, "M0.0-Napier-1970-01-01");
    }
}
