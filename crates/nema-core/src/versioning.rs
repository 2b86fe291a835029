// EAT identity and versioning
//
// An event is identified by its title; each publish against an event adds a
// record with the next version number. Both rules are pure so the publish
// orchestrator decides when the store is consulted.

use chrono::{DateTime, Utc};

use crate::eat::Eat;

/// Build the event title `M<magnitude:.1>-<location>-<YYYY-MM-DD>`.
///
/// The magnitude is rounded by formatting only, and the location is inserted
/// verbatim. The date is the UTC calendar date of the event.
pub fn format_event_title(magnitude: f32, location: &str, event_date: DateTime<Utc>) -> String {
    format!(
        "M{:.1}-{}-{}",
        magnitude,
        location,
        event_date.format("%Y-%m-%d")
    )
}

/// Version to assign to the next record of a chain whose current head is `latest`
pub fn next_version(latest: Option<&Eat>) -> u32 {
    latest.map_or(1, |eat| eat.version + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eat::EatStatus;
    use chrono::TimeZone;

    fn eat_with_version(version: u32) -> Eat {
        Eat {
            id: Some(1),
            event_title: "M5.0-X-2026-01-01".to_string(),
            location: "X".to_string(),
            event_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            magnitude: 5.0,
            earthquake_url: String::new(),
            version,
            event_comments: String::new(),
            beach_marine_threat: false,
            land_threat: false,
            status: EatStatus::Preliminary,
            tep_activated: false,
            attachments: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_format_event_title() {
        let date = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            format_event_title(5.0, "Wellington", date),
            "M5.0-Wellington-2026-01-15"
        );
    }

    #[test]
    fn test_format_event_title_single_decimal() {
        let date = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(format_event_title(5.04, "A", date), "M5.0-A-2026-01-15");
        assert_eq!(format_event_title(7.0, "A", date), "M7.0-A-2026-01-15");
        assert_eq!(format_event_title(6.27, "A", date), "M6.3-A-2026-01-15");
    }

    #[test]
    fn test_format_event_title_keeps_location_verbatim() {
        let date = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 0).unwrap();
        assert_eq!(
            format_event_title(4.5, "East Cape, NZ", date),
            "M4.5-East Cape, NZ-2026-03-02"
        );
        assert_ne!(
            format_event_title(4.5, "East  Cape", date),
            format_event_title(4.5, "East Cape", date)
        );
    }

    #[test]
    fn test_next_version() {
        assert_eq!(next_version(None), 1);
        assert_eq!(next_version(Some(&eat_with_version(1))), 2);
        assert_eq!(next_version(Some(&eat_with_version(3))), 4);
    }
}
