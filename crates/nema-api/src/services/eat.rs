// EAT query service
//
// Read paths for the JSON API and the HTML pages. Nothing is cached; every
// call goes to the content store.

use chrono::{DateTime, Utc};
use nema_core::{
    distinct_event_titles, history_window_start, version_history, window_start, Eat, EatFile,
    EatStore, StoreError,
};
use std::sync::Arc;

/// Listing window used by the editor dropdown and the dashboard landing view
pub const EVENT_WINDOW_DAYS: i64 = 7;

/// What the dashboard shows: one record and the versions of its event
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub current: Option<Eat>,
    pub versions: Vec<Eat>,
}

pub struct EatService {
    store: Arc<dyn EatStore>,
}

impl EatService {
    pub fn new(store: Arc<dyn EatStore>) -> Self {
        Self { store }
    }

    /// Distinct event titles of the last `days` days, most recent event first
    pub async fn list_distinct_events(&self, days: i64) -> Result<Vec<String>, StoreError> {
        let feed = self.store.list_eats(window_start(Utc::now(), days)).await?;
        Ok(distinct_event_titles(&feed))
    }

    pub async fn get(&self, id: i64) -> Result<Option<Eat>, StoreError> {
        self.store.get_eat(id).await
    }

    pub async fn latest(&self, event_title: &str) -> Result<Option<Eat>, StoreError> {
        self.store.latest_version(event_title).await
    }

    /// Every stored version of `current`'s event, newest event date first
    pub async fn version_history(&self, current: &Eat) -> Result<Vec<Eat>, StoreError> {
        self.history_since(&current.event_title, current.event_date).await
    }

    async fn history_since(
        &self,
        event_title: &str,
        event_date: DateTime<Utc>,
    ) -> Result<Vec<Eat>, StoreError> {
        let feed = self
            .store
            .list_eats(history_window_start(event_date))
            .await?;
        Ok(version_history(feed, event_title))
    }

    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<EatFile, StoreError> {
        self.store.upload_file(filename, data).await
    }

    /// Resolve the record the dashboard should display.
    ///
    /// With an event title the latest version is shown, or `version` when the
    /// store has it. Without one the latest version of the most recent event is
    /// shown. The history window starts before the earlier of the shown and
    /// latest records, so both are listed even when versions carry different
    /// event dates. History failures are logged and leave the version list
    /// empty.
    pub async fn load_dashboard(
        &self,
        event_title: Option<&str>,
        version: Option<u32>,
    ) -> Result<DashboardView, StoreError> {
        let latest = match event_title {
            Some(title) => self.latest(title).await?,
            None => {
                let events = self.list_distinct_events(EVENT_WINDOW_DAYS).await?;
                match events.first() {
                    Some(title) => self.latest(title).await?,
                    None => None,
                }
            }
        };

        let Some(latest) = latest else {
            return Ok(DashboardView::default());
        };

        let current = match version.filter(|_| event_title.is_some()) {
            Some(version) if version != latest.version => self
                .store
                .find_version(&latest.event_title, version)
                .await?
                .unwrap_or_else(|| latest.clone()),
            _ => latest.clone(),
        };

        let anchor = current.event_date.min(latest.event_date);
        let versions = match self.history_since(&latest.event_title, anchor).await {
            Ok(versions) => versions,
            Err(e) => {
                tracing::warn!(
                    event_title = %latest.event_title,
                    "Failed to load version history: {}",
                    e
                );
                Vec::new()
            }
        };

        Ok(DashboardView {
            current: Some(current),
            versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use nema_core::memory::InMemoryEatStore;
    use nema_core::EatStatus;

    fn eat(title: &str, version: u32, event_date: DateTime<Utc>) -> Eat {
        Eat {
            id: None,
            event_title: title.to_string(),
            location: "Wellington".to_string(),
            event_date,
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

    fn service(eats: Vec<Eat>) -> EatService {
        EatService::new(Arc::new(InMemoryEatStore::with_eats(eats)))
    }

    /// Store whose reads always fail
    struct UnavailableStore;

    #[async_trait]
    impl EatStore for UnavailableStore {
        async fn list_eats(&self, _since: DateTime<Utc>) -> Result<Vec<Eat>, StoreError> {
            Err(StoreError::transport("connection refused"))
        }
        async fn get_eat(&self, _id: i64) -> Result<Option<Eat>, StoreError> {
            Err(StoreError::transport("connection refused"))
        }
        async fn latest_version(&self, _title: &str) -> Result<Option<Eat>, StoreError> {
            Err(StoreError::transport("connection refused"))
        }
        async fn find_version(
            &self,
            _title: &str,
            _version: u32,
        ) -> Result<Option<Eat>, StoreError> {
            Err(StoreError::transport("connection refused"))
        }
        async fn create_eat(&self, _eat: &Eat) -> Result<Eat, StoreError> {
            Err(StoreError::transport("connection refused"))
        }
        async fn upload_file(&self, _name: &str, _data: Vec<u8>) -> Result<EatFile, StoreError> {
            Err(StoreError::transport("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_list_distinct_events_dedupes_within_window() {
        let now = Utc::now();
        let service = service(vec![
            eat("A", 1, now - Duration::hours(3)),
            eat("A", 2, now - Duration::hours(3)),
            eat("B", 1, now - Duration::hours(1)),
            eat("OLD", 1, now - Duration::days(30)),
        ]);

        let events = service.list_distinct_events(7).await.unwrap();
        assert_eq!(events, vec!["B", "A"]);

        let events = service.list_distinct_events(60).await.unwrap();
        assert_eq!(events, vec!["B", "A", "OLD"]);
    }

    #[tokio::test]
    async fn test_version_history_filters_title() {
        let date = Utc::now() - Duration::days(2);
        let service = service(vec![
            eat("A", 1, date),
            eat("A", 2, date),
            eat("B", 1, date),
        ]);

        let latest = service.latest("A").await.unwrap().unwrap();
        let history = service.version_history(&latest).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.event_title == "A"));
    }

    #[tokio::test]
    async fn test_load_dashboard_defaults_to_most_recent_event() {
        let now = Utc::now();
        let service = service(vec![
            eat("A", 1, now - Duration::days(2)),
            eat("B", 1, now - Duration::hours(2)),
            eat("B", 2, now - Duration::hours(2)),
        ]);

        let view = service.load_dashboard(None, None).await.unwrap();
        let current = view.current.unwrap();
        assert_eq!(current.event_title, "B");
        assert_eq!(current.version, 2);
        assert_eq!(view.versions.len(), 2);
    }

    #[tokio::test]
    async fn test_load_dashboard_selects_requested_version() {
        let date = Utc::now() - Duration::days(1);
        let service = service(vec![eat("A", 1, date), eat("A", 2, date), eat("A", 3, date)]);

        let view = service.load_dashboard(Some("A"), Some(2)).await.unwrap();
        assert_eq!(view.current.unwrap().version, 2);

        // Unknown versions fall back to the latest
        let view = service.load_dashboard(Some("A"), Some(9)).await.unwrap();
        assert_eq!(view.current.unwrap().version, 3);

        let view = service.load_dashboard(Some("A"), None).await.unwrap();
        assert_eq!(view.current.unwrap().version, 3);
    }

    #[tokio::test]
    async fn test_load_dashboard_reaches_versions_with_earlier_event_dates() {
        let first = Utc::now() - Duration::days(5);
        let service = service(vec![
            eat("A", 1, first),
            eat("A", 2, first + Duration::days(3)),
        ]);

        let view = service.load_dashboard(Some("A"), Some(1)).await.unwrap();
        let current = view.current.unwrap();
        assert_eq!(current.version, 1);
        assert_eq!(current.event_date, first);

        let mut listed: Vec<u32> = view.versions.iter().map(|e| e.version).collect();
        listed.sort();
        assert_eq!(listed, vec![1, 2]);

        let view = service.load_dashboard(Some("A"), None).await.unwrap();
        assert_eq!(view.current.unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_load_dashboard_empty() {
        let service = service(vec![]);
        let view = service.load_dashboard(None, None).await.unwrap();
        assert!(view.current.is_none());
        assert!(view.versions.is_empty());

        let view = service.load_dashboard(Some("missing"), None).await.unwrap();
        assert!(view.current.is_none());
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let service = EatService::new(Arc::new(UnavailableStore));
        assert!(service.list_distinct_events(7).await.is_err());
        assert!(service.get(1).await.is_err());
        assert!(service.load_dashboard(None, None).await.is_err());
        assert!(service.load_dashboard(Some("A"), Some(1)).await.is_err());
    }
}
