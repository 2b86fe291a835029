// Event listing rules
//
// The store returns EATs newest event first. These helpers turn that feed into
// the views the editor and dashboard need.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::eat::Eat;

/// Distinct event titles in first-seen order
pub fn distinct_event_titles(feed: &[Eat]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut titles = Vec::new();
    for eat in feed {
        if seen.insert(eat.event_title.as_str()) {
            titles.push(eat.event_title.clone());
        }
    }
    titles
}

/// Start of the listing window ending at `now`
pub fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

/// Start of the feed that holds every version of the event dated `event_date`
pub fn history_window_start(event_date: DateTime<Utc>) -> DateTime<Utc> {
    event_date - Duration::days(1)
}

/// Records in `feed` that belong to `event_title`, keeping feed order.
///
/// The store query behind `feed` is a date-window superset; this is the exact
/// title filter.
pub fn version_history(feed: Vec<Eat>, event_title: &str) -> Vec<Eat> {
    feed.into_iter()
        .filter(|eat| eat.event_title == event_title)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eat::EatStatus;
    use chrono::TimeZone;

    fn eat(title: &str, version: u32) -> Eat {
        Eat {
            id: Some(version as i64),
            event_title: title.to_string(),
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
    fn test_distinct_event_titles_preserves_first_seen_order() {
        let feed = vec![eat("A", 2), eat("A", 1), eat("B", 1)];
        assert_eq!(distinct_event_titles(&feed), vec!["A", "B"]);

        let feed = vec![eat("B", 1), eat("A", 1), eat("B", 2)];
        assert_eq!(distinct_event_titles(&feed), vec!["B", "A"]);
    }

    #[test]
    fn test_distinct_event_titles_empty() {
        assert!(distinct_event_titles(&[]).is_empty());
    }

    #[test]
    fn test_windows() {
        let now = Utc.with_ymd_and_hms(2026, 1, 8, 12, 0, 0).unwrap();
        assert_eq!(
            window_start(now, 7),
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(
            history_window_start(now),
            Utc.with_ymd_and_hms(2026, 1, 7, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_version_history_exact_title() {
        let feed = vec![
            eat("M5.0-X-2026-01-01", 2),
            eat("M5.0-X-2026-01-01 ", 1),
            eat("M5.0-Y-2026-01-01", 1),
            eat("M5.0-X-2026-01-01", 1),
        ];
        let history = version_history(feed, "M5.0-X-2026-01-01");
        let versions: Vec<u32> = history.iter().map(|e| e.version).collect();
        assert_eq!(versions, vec![2, 1]);
    }
}
