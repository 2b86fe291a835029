// Publish orchestrator
//
// Validates a publish request, resolves the record's identity (event title and
// version), persists it, then hands the stored record to the PDF renderer and
// notifier in a detached task.
//
// Identity resolution and the create call run under a process-wide lock so two
// `new_version` publishes handled by this instance cannot compute the same
// version. Instances behind a load balancer can still race.

use nema_core::{
    format_event_title, next_version, Eat, EatNotifier, EatRenderer, EatStore, PublishMode,
    PublishRequest, PublishResponse, StoreError, ValidatedPublish, ValidationError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Reasons a publish is rejected. The display text is returned to the editor.
#[derive(Debug, Error)]
pub enum PublishFailure {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to look up existing EAT")]
    ExistingLookup(#[source] StoreError),

    #[error("existing EAT not found")]
    ExistingNotFound,

    #[error("failed to look up latest version")]
    LatestLookup(#[source] StoreError),

    #[error("failed to save EAT: {0}")]
    Save(#[source] StoreError),
}

/// Outcome of the post-publish side effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideEffectReport {
    pub pdf_rendered: bool,
    pub notified: bool,
}

pub struct PublishService {
    store: Arc<dyn EatStore>,
    renderer: Arc<dyn EatRenderer>,
    notifier: Option<Arc<dyn EatNotifier>>,
    identity_lock: Mutex<()>,
}

impl PublishService {
    pub fn new(
        store: Arc<dyn EatStore>,
        renderer: Arc<dyn EatRenderer>,
        notifier: Option<Arc<dyn EatNotifier>>,
    ) -> Self {
        Self {
            store,
            renderer,
            notifier,
            identity_lock: Mutex::new(()),
        }
    }

    /// Publish a record. Rejections are reported in the response, never as errors.
    pub async fn publish(&self, req: PublishRequest) -> PublishResponse {
        self.publish_with_handle(req).await.0
    }

    /// Like [`PublishService::publish`], also returning the side-effect task
    /// when the record was stored
    pub async fn publish_with_handle(
        &self,
        req: PublishRequest,
    ) -> (PublishResponse, Option<JoinHandle<SideEffectReport>>) {
        match self.create(req).await {
            Ok(created) => {
                tracing::info!(
                    id = ?created.id,
                    event_title = %created.event_title,
                    version = created.version,
                    status = %created.status,
                    "EAT published"
                );
                let response = PublishResponse::published(&created);
                let handle = self.spawn_side_effects(created);
                (response, Some(handle))
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Publish rejected: {}", e);
                (PublishResponse::failed(e.to_string()), None)
            }
        }
    }

    /// Validate, resolve identity and persist
    pub async fn create(&self, req: PublishRequest) -> Result<Eat, PublishFailure> {
        let ValidatedPublish {
            mode,
            existing_eat_id,
            mut draft,
        } = req.validate()?;

        let _guard = self.identity_lock.lock().await;

        match mode {
            PublishMode::NewEvent => {
                draft.event_title =
                    format_event_title(draft.magnitude, &draft.location, draft.event_date);
                draft.version = 1;
            }
            PublishMode::NewVersion => {
                draft.event_title = match existing_eat_id {
                    Some(id) => {
                        self.store
                            .get_eat(id)
                            .await
                            .map_err(PublishFailure::ExistingLookup)?
                            .ok_or(PublishFailure::ExistingNotFound)?
                            .event_title
                    }
                    None => format_event_title(draft.magnitude, &draft.location, draft.event_date),
                };

                let latest = self
                    .store
                    .latest_version(&draft.event_title)
                    .await
                    .map_err(PublishFailure::LatestLookup)?;
                draft.version = next_version(latest.as_ref());
            }
        }

        self.store
            .create_eat(&draft)
            .await
            .map_err(PublishFailure::Save)
    }

    fn spawn_side_effects(&self, eat: Eat) -> JoinHandle<SideEffectReport> {
        let renderer = self.renderer.clone();
        let notifier = self.notifier.clone();
        tokio::spawn(async move { run_side_effects(renderer, notifier.as_deref(), &eat).await })
    }
}

/// Render the PDF and send the notification for a stored record.
///
/// Both steps are best-effort: failures are logged and the notification is
/// sent without an attachment when rendering fails. Rendering runs on the
/// blocking pool.
pub async fn run_side_effects(
    renderer: Arc<dyn EatRenderer>,
    notifier: Option<&dyn EatNotifier>,
    eat: &Eat,
) -> SideEffectReport {
    let mut report = SideEffectReport::default();

    let pdf = match render_blocking(renderer, eat.clone()).await {
        Ok(bytes) => {
            report.pdf_rendered = true;
            Some(bytes)
        }
        Err(e) => {
            tracing::warn!(
                event_title = %eat.event_title,
                version = eat.version,
                "PDF generation failed: {:#}",
                e
            );
            None
        }
    };

    let Some(notifier) = notifier else {
        tracing::debug!("Email notifications not configured, skipping");
        return report;
    };

    match notifier.notify(eat, pdf.as_deref()).await {
        Ok(()) => report.notified = true,
        Err(e) => {
            tracing::warn!(
                event_title = %eat.event_title,
                version = eat.version,
                "Email send failed: {:#}",
                e
            );
        }
    }

    report
}

async fn render_blocking(renderer: Arc<dyn EatRenderer>, eat: Eat) -> anyhow::Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || renderer.render(&eat)).await?
}
