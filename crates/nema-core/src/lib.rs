// EAT Core Abstractions
//
// This crate holds everything about Emergency Advisory Text records that does
// not need a network connection.
//
// Key design decisions:
// - Domain entity types (Eat, EatFile, EatStatus) match the content store wire format
// - Versioning and listing rules are pure functions over those types
// - Publish requests are validated here so the orchestrator only sees well-formed input
// - Traits (EatStore, EatRenderer, EatNotifier) decouple the orchestrator from
//   the FastSchema client, the PDF renderer and the SMTP notifier

pub mod eat;
pub mod error;
pub mod listing;
pub mod publish;
pub mod traits;
pub mod versioning;

// In-memory implementations for testing
pub mod memory;

// Re-exports for convenience
pub use eat::{yes_no, Eat, EatFile, EatStatus};
pub use error::StoreError;
pub use listing::{distinct_event_titles, history_window_start, version_history, window_start};
pub use publish::{PublishMode, PublishRequest, PublishResponse, ValidatedPublish, ValidationError};
pub use traits::{EatNotifier, EatRenderer, EatStore};
pub use versioning::{format_event_title, next_version};
