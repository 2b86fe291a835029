// NEMA MAR portal library
// Decision: Shared library for the server binary and in-process router tests

// JSON API routes and types (shared for OpenAPI generation)
pub mod api;

// Router assembly and shared state
pub mod app;

// Environment configuration
pub mod config;

// HTML pages (editor, preview, dashboard)
pub mod pages;

// Services layer
pub mod services;
pub use services::{EatService, PublishService};

// OpenAPI spec generation
pub mod openapi;

pub use app::{build_app, AppState};
pub use config::AppConfig;
