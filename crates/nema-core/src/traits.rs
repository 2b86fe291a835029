// Core traits for pluggable backends
//
// These traits let the publish orchestrator and the read paths run against:
// - The FastSchema client in production
// - In-memory and failing implementations in tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::eat::{Eat, EatFile};
use crate::error::StoreError;

// ============================================================================
// EatStore - System of record for EATs and their attachments
// ============================================================================

/// Storage backend for EAT records
///
/// The store assigns ids and timestamps, orders results and owns durability.
#[async_trait]
pub trait EatStore: Send + Sync {
    /// EATs with `event_date >= since`, newest event first, at most 100
    async fn list_eats(&self, since: DateTime<Utc>) -> Result<Vec<Eat>, StoreError>;

    /// Point lookup; `None` when the store reports the record as not found
    async fn get_eat(&self, id: i64) -> Result<Option<Eat>, StoreError>;

    /// Highest version recorded for `event_title`
    async fn latest_version(&self, event_title: &str) -> Result<Option<Eat>, StoreError>;

    /// A specific version of `event_title`
    async fn find_version(
        &self,
        event_title: &str,
        version: u32,
    ) -> Result<Option<Eat>, StoreError>;

    /// Persist a new record and return the store's canonical copy
    async fn create_eat(&self, eat: &Eat) -> Result<Eat, StoreError>;

    /// Store an attachment
    async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<EatFile, StoreError>;
}

// ============================================================================
// EatRenderer - Document rendering of a persisted record
// ============================================================================

/// Renders an EAT as a PDF document
pub trait EatRenderer: Send + Sync {
    fn render(&self, eat: &Eat) -> anyhow::Result<Vec<u8>>;
}

// ============================================================================
// EatNotifier - Outbound notification of a published record
// ============================================================================

/// Notifies recipients about a published EAT
#[async_trait]
pub trait EatNotifier: Send + Sync {
    /// Send a notification, attaching `pdf` when one was rendered
    async fn notify(&self, eat: &Eat, pdf: Option<&[u8]>) -> anyhow::Result<()>;
}
