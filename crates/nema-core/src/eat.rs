// EAT domain types
//
// These types mirror the `eat` content type registered with FastSchema.
// Field names are snake_case on the wire; ids and timestamps are assigned by
// the store and omitted when creating a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::publish::ValidationError;

/// Advisory status. Only these two values are accepted by the portal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EatStatus {
    Preliminary,
    Confirmed,
}

impl fmt::Display for EatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EatStatus::Preliminary => write!(f, "preliminary"),
            EatStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

impl FromStr for EatStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preliminary" => Ok(EatStatus::Preliminary),
            "confirmed" => Ok(EatStatus::Confirmed),
            _ => Err(ValidationError::InvalidStatus),
        }
    }
}

/// An attachment held in the content store's file manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EatFile {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: i64,
    /// MIME type
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub mime_type: String,
}

impl EatFile {
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }
}

/// Whether a MIME type is one the dashboard renders inline
pub fn is_image_mime(mime_type: &str) -> bool {
    matches!(
        mime_type,
        "image/png" | "image/jpeg" | "image/gif" | "image/webp"
    )
}

/// Emergency Advisory Text record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Eat {
    /// Assigned by the content store; absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// `M<magnitude>-<location>-<YYYY-MM-DD>`, shared by every version of an event
    pub event_title: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub magnitude: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub earthquake_url: String,
    pub version: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_comments: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub beach_marine_threat: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub land_threat: bool,
    pub status: EatStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tep_activated: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attachments: Vec<EatFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Eat {
    /// Event date as shown to readers, e.g. `2026-01-15 10:30 UTC`
    pub fn event_date_display(&self) -> String {
        self.event_date.format("%Y-%m-%d %H:%M UTC").to_string()
    }

    /// Magnitude rendered with one decimal
    pub fn magnitude_display(&self) -> String {
        format!("{:.1}", self.magnitude)
    }

    /// File name used when the record is exported as a document
    pub fn document_name(&self, extension: &str) -> String {
        format!("{}_v{}.{}", self.event_title, self.version, extension)
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

// FastSchema returns `null` for unset optional fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
