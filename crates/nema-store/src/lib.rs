// FastSchema content store client
//
// This crate implements nema_core::EatStore over FastSchema's JSON API:
// - ContentStoreClient: authenticated reqwest client
// - types: FastSchema response envelopes

pub mod client;
pub mod types;

pub use client::{ContentStoreClient, REQUEST_TIMEOUT};
