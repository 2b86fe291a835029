// In-memory implementations for testing
//
// InMemoryEatStore behaves like the content store as far as the portal can
// observe: it assigns ids and timestamps, filters by event date, sorts newest
// first, caps list pages and reports unknown ids as not found.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::eat::{Eat, EatFile};
use crate::error::StoreError;
use crate::traits::EatStore;

/// Page size the content store applies to list queries
pub const LIST_LIMIT: usize = 100;

// ============================================================================
// InMemoryEatStore - Stores EATs in memory
// ============================================================================

/// In-memory EAT store
#[derive(Debug)]
pub struct InMemoryEatStore {
    eats: RwLock<Vec<Eat>>,
    files: RwLock<Vec<EatFile>>,
    next_id: AtomicI64,
    creates: AtomicUsize,
}

impl Default for InMemoryEatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEatStore {
    pub fn new() -> Self {
        Self::with_eats(Vec::new())
    }

    /// Seed the store with existing records. Records without an id get one.
    pub fn with_eats(eats: Vec<Eat>) -> Self {
        let mut next_id = eats.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
        let eats = eats
            .into_iter()
            .map(|mut eat| {
                if eat.id.is_none() {
                    eat.id = Some(next_id);
                    next_id += 1;
                }
                eat
            })
            .collect();

        Self {
            eats: RwLock::new(eats),
            files: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(next_id),
            creates: AtomicUsize::new(0),
        }
    }

    /// Every stored record in insertion order
    pub async fn all(&self) -> Vec<Eat> {
        self.eats.read().await.clone()
    }

    /// Number of successful `create_eat` calls
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Every uploaded file in upload order
    pub async fn files(&self) -> Vec<EatFile> {
        self.files.read().await.clone()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl EatStore for InMemoryEatStore {
    async fn list_eats(&self, since: DateTime<Utc>) -> Result<Vec<Eat>, StoreError> {
        let mut eats: Vec<Eat> = self
            .eats
            .read()
            .await
            .iter()
            .filter(|eat| eat.event_date >= since)
            .cloned()
            .collect();
        eats.sort_by(|a, b| b.event_date.cmp(&a.event_date));
        eats.truncate(LIST_LIMIT);
        Ok(eats)
    }

    async fn get_eat(&self, id: i64) -> Result<Option<Eat>, StoreError> {
        Ok(self
            .eats
            .read()
            .await
            .iter()
            .find(|eat| eat.id == Some(id))
            .cloned())
    }

    async fn latest_version(&self, event_title: &str) -> Result<Option<Eat>, StoreError> {
        Ok(self
            .eats
            .read()
            .await
            .iter()
            .filter(|eat| eat.event_title == event_title)
            .max_by_key(|eat| eat.version)
            .cloned())
    }

    async fn find_version(
        &self,
        event_title: &str,
        version: u32,
    ) -> Result<Option<Eat>, StoreError> {
        Ok(self
            .eats
            .read()
            .await
            .iter()
            .find(|eat| eat.event_title == event_title && eat.version == version)
            .cloned())
    }

    async fn create_eat(&self, eat: &Eat) -> Result<Eat, StoreError> {
        let now = Utc::now();
        let mut created = eat.clone();
        created.id = Some(self.allocate_id());
        created.created_at = Some(now);
        created.updated_at = Some(now);

        self.eats.write().await.push(created.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<EatFile, StoreError> {
        let id = self.allocate_id();
        let file = EatFile {
            id,
            name: filename.to_string(),
            path: format!("files/{}", filename),
            url: None,
            size: data.len() as i64,
            mime_type: String::new(),
        };
        self.files.write().await.push(file.clone());
        Ok(file)
    }
}
