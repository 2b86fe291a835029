// NEMA MAR portal server
// Decision: Content store login and schema registration are best-effort at startup
// Decision: Templates are required; a missing template directory aborts startup

use anyhow::{Context, Result};
use nema_api::pages::Templates;
use nema_api::{build_app, AppConfig, AppState};
use nema_core::{EatNotifier, EatStore};
use nema_notify::{EmailConfig, PdfRenderer, SmtpNotifier};
use nema_store::ContentStoreClient;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env for local development
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nema_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("nema-api starting...");

    let config = AppConfig::from_env();

    let client = Arc::new(
        ContentStoreClient::new(&config.fastschema_url)
            .context("Failed to create content store client")?,
    );
    tracing::info!(url = %client.base_url(), "Content store configured");

    match config.credentials() {
        Some((user, pass)) => match client.login(user, pass).await {
            Ok(()) => tracing::info!("Logged in to content store"),
            Err(e) => tracing::warn!("Failed to log in to content store: {}", e),
        },
        None => tracing::warn!(
            "FS_ADMIN_USER/FS_ADMIN_PASS not set, content store requests are unauthenticated"
        ),
    }

    register_schema(&client, &config.schema_path).await;

    let templates = Templates::load(&config.template_dir).with_context(|| {
        format!(
            "Failed to load templates from {}",
            config.template_dir.display()
        )
    })?;
    tracing::info!(dir = %config.template_dir.display(), "Templates loaded");

    // Email is optional; publishing works without it
    let notifier: Option<Arc<dyn EatNotifier>> = match EmailConfig::from_env() {
        Ok(email) => {
            let recipients = email.recipients.len();
            match SmtpNotifier::new(email) {
                Ok(notifier) => {
                    tracing::info!(recipients, "Email notifications enabled");
                    Some(Arc::new(notifier))
                }
                Err(e) => {
                    tracing::warn!("Email notifications disabled: {}", e);
                    None
                }
            }
        }
        Err(e) => {
            tracing::warn!("Email notifications disabled: {}", e);
            None
        }
    };

    let store: Arc<dyn EatStore> = client;
    let state = AppState::new(
        store,
        Arc::new(PdfRenderer::new()),
        notifier,
        Arc::new(templates),
    );

    // Add tracing
    let app = build_app(state).layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen_addr))?;
    tracing::info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Register the EAT content type. Failures are logged and startup continues.
async fn register_schema(client: &ContentStoreClient, path: &Path) {
    let schema = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Could not read schema file {}: {}", path.display(), e);
            return;
        }
    };

    match client.apply_schema(&schema).await {
        Ok(()) => tracing::info!(path = %path.display(), "EAT schema applied"),
        Err(e) => tracing::warn!("Failed to apply schema: {}", e),
    }
}
