// Publish request DTOs and validation
//
// The editor submits free-form fields; validation turns them into a draft Eat
// (no title or version yet) plus the identity instructions the orchestrator
// needs. Validation failures are reported back to the editor as soft errors,
// never as HTTP failures.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::eat::{Eat, EatFile, EatStatus};

/// Format of `event_date` as sent by a `datetime-local` input
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Business-level publish validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("location is required")]
    MissingLocation,

    #[error("event_date is required")]
    MissingEventDate,

    #[error("status must be 'preliminary' or 'confirmed'")]
    InvalidStatus,

    #[error("mode must be 'new_event' or 'new_version'")]
    InvalidMode,

    #[error("invalid event_date format")]
    InvalidEventDate,
}

/// How the published record relates to existing records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Start a new chain at version 1
    NewEvent,
    /// Append to an existing chain
    NewVersion,
}

impl FromStr for PublishMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_event" => Ok(PublishMode::NewEvent),
            "new_version" => Ok(PublishMode::NewVersion),
            _ => Err(ValidationError::InvalidMode),
        }
    }
}

/// JSON payload of `POST /api/publish`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PublishRequest {
    /// `new_event` or `new_version`
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub location: String,
    /// `YYYY-MM-DDTHH:MM`, interpreted as UTC
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub magnitude: f32,
    #[serde(default)]
    pub earthquake_url: String,
    #[serde(default)]
    pub event_comments: String,
    #[serde(default)]
    pub beach_marine_threat: bool,
    #[serde(default)]
    pub land_threat: bool,
    /// `preliminary` or `confirmed`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tep_activated: bool,
    /// Files already uploaded through `/api/upload`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attachments: Vec<EatFile>,
    /// Record whose event title a new version should reuse
    #[serde(default)]
    pub existing_eat_id: Option<i64>,
}

/// A publish request that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedPublish {
    pub mode: PublishMode,
    /// Only set for a positive id
    pub existing_eat_id: Option<i64>,
    /// Record with an empty title and version 0, filled in by identity resolution
    pub draft: Eat,
}

impl PublishRequest {
    /// Validate fields in the order the editor reports them.
    pub fn validate(self) -> Result<ValidatedPublish, ValidationError> {
        if self.location.is_empty() {
            return Err(ValidationError::MissingLocation);
        }
        if self.event_date.is_empty() {
            return Err(ValidationError::MissingEventDate);
        }
        let status: EatStatus = self.status.parse()?;
        let mode: PublishMode = self.mode.parse()?;
        let event_date = parse_event_date(&self.event_date)?;

        let draft = Eat {
            id: None,
            event_title: String::new(),
            location: self.location,
            event_date,
            magnitude: self.magnitude,
            earthquake_url: self.earthquake_url,
            version: 0,
            event_comments: self.event_comments,
            beach_marine_threat: self.beach_marine_threat,
            land_threat: self.land_threat,
            status,
            tep_activated: self.tep_activated,
            attachments: self.attachments,
            created_at: None,
            updated_at: None,
        };

        Ok(ValidatedPublish {
            mode,
            existing_eat_id: self.existing_eat_id.filter(|id| *id > 0),
            draft,
        })
    }
}

/// Parse a `datetime-local` value as a UTC instant
pub fn parse_event_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    NaiveDateTime::parse_from_str(value, EVENT_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ValidationError::InvalidEventDate)
}

/// Response of `POST /api/publish`; always sent with HTTP 200
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PublishResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResponse {
    pub fn published(eat: &Eat) -> Self {
        Self {
            success: true,
            id: eat.id,
            version: Some(eat.version),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            version: None,
            error: Some(message.into()),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<EatFile>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<EatFile>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn request() -> PublishRequest {
        PublishRequest {
            mode: "new_event".to_string(),
            location: "Wellington".to_string(),
            event_date: "2026-01-15T10:30".to_string(),
            magnitude: 5.0,
            status: "preliminary".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_builds_draft() {
        let validated = request().validate().unwrap();
        assert_eq!(validated.mode, PublishMode::NewEvent);
        assert_eq!(validated.existing_eat_id, None);
        assert_eq!(
            validated.draft.event_date,
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap()
        );
        assert_eq!(validated.draft.status, EatStatus::Preliminary);
        assert!(validated.draft.event_title.is_empty());
    }

    #[test]
    fn test_validate_reports_first_failure() {
        let mut req = request();
        req.location.clear();
        req.status = "urgent".to_string();
        assert_eq!(req.validate().unwrap_err(), ValidationError::MissingLocation);

        let mut req = request();
        req.event_date.clear();
        assert_eq!(req.validate().unwrap_err(), ValidationError::MissingEventDate);

        let mut req = request();
        req.status = "urgent".to_string();
        req.event_date = "not a date".to_string();
        assert_eq!(req.validate().unwrap_err(), ValidationError::InvalidStatus);

        let mut req = request();
        req.mode = "replace".to_string();
        assert_eq!(req.validate().unwrap_err(), ValidationError::InvalidMode);

        let mut req = request();
        req.event_date = "15/01/2026 10:30".to_string();
        assert_eq!(req.validate().unwrap_err(), ValidationError::InvalidEventDate);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::InvalidStatus.to_string(),
            "status must be 'preliminary' or 'confirmed'"
        );
        assert_eq!(
            ValidationError::InvalidEventDate.to_string(),
            "invalid event_date format"
        );
    }

    #[test]
    fn test_existing_id_ignored_unless_positive() {
        let mut req = request();
        req.mode = "new_version".to_string();
        req.existing_eat_id = Some(0);
        assert_eq!(req.clone().validate().unwrap().existing_eat_id, None);

        req.existing_eat_id = Some(42);
        assert_eq!(req.validate().unwrap().existing_eat_id, Some(42));
    }

    #[test]
    fn test_request_decodes_editor_payload() {
        let req: PublishRequest = serde_json::from_value(json!({
            "mode": "new_version",
            "location": "Napier",
            "event_date": "2026-04-01T08:15",
            "magnitude": 6.2,
            "status": "confirmed",
            "beach_marine_threat": true,
            "attachments": null,
            "existing_eat_id": 12
        }))
        .unwrap();
        assert_eq!(req.existing_eat_id, Some(12));
        assert!(req.attachments.is_empty());
        assert!(req.beach_marine_threat);
        assert!(!req.land_threat);
    }

    #[test]
    fn test_response_shapes() {
        let failed = serde_json::to_value(PublishResponse::failed("location is required")).unwrap();
        assert_eq!(
            failed,
            json!({"success": false, "error": "location is required"})
        );

        let ok = PublishResponse {
            success: true,
            id: Some(99),
            version: Some(2),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(ok).unwrap(),
            json!({"success": true, "id": 99, "version": 2})
        );
    }
}
