// HTML template environment
//
// Templates are loaded from a directory with minijinja's path loader and
// checked at startup, so a missing or broken template stops the server
// before it binds.

use chrono::{DateTime, Utc};
use minijinja::{path_loader, Environment};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Templates that must parse for the server to start
pub const REQUIRED_TEMPLATES: [&str; 5] = [
    "base.html",
    "eat_fields.html",
    "editor.html",
    "preview.html",
    "dashboard.html",
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template directory not found: {0}")]
    MissingDir(PathBuf),

    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load and parse every page template under `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TemplateError::MissingDir(dir.to_path_buf()));
        }

        let mut env = Environment::new();
        env.set_loader(path_loader(dir));
        env.add_filter("format_date", format_date);
        env.add_filter("format_date_display", format_date_display);
        env.add_filter("format_magnitude", format_magnitude);
        env.add_filter("yes_no", yes_no);
        env.add_filter("is_image", is_image);
        env.add_filter("is_pdf", is_pdf);

        for name in REQUIRED_TEMPLATES {
            env.get_template(name)?;
        }

        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, TemplateError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}

// Dates reach templates as RFC 3339 strings; anything else is shown verbatim

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// `datetime-local` input value
fn format_date(value: String) -> String {
    parse_date(&value)
        .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or(value)
}

fn format_date_display(value: String) -> String {
    parse_date(&value)
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or(value)
}

fn format_magnitude(value: f64) -> String {
    format!("{:.1}", value)
}

fn yes_no(value: bool) -> String {
    nema_core::yes_no(value).to_string()
}

fn is_image(mime_type: String) -> bool {
    nema_core::eat::is_image_mime(&mime_type)
}

fn is_pdf(mime_type: String) -> bool {
    mime_type == "application/pdf"
}
