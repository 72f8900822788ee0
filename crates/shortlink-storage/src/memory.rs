use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use shortlink_core::store::{Result, UrlStore};
use shortlink_core::{NewUrlRecord, ShortCode, StorageError, UrlRecord};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::trace;

/// In-memory implementation of [`UrlStore`] using DashMap.
///
/// Records live as long as the process. Intended for single-node
/// development setups and tests.
#[derive(Debug)]
pub struct InMemoryStore {
    next_id: AtomicI64,
    by_code: DashMap<ShortCode, UrlRecord>,
    by_id: DashMap<i64, ShortCode>,
    /// Lowest record id per original URL.
    by_url: DashMap<String, i64>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            by_code: DashMap::new(),
            by_id: DashMap::new(),
            by_url: DashMap::new(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlStore for InMemoryStore {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        let stored = match self.by_code.entry(record.short_code.clone()) {
            Entry::Occupied(_) => {
                return Err(StorageError::Conflict(record.short_code.to_string()));
            }
            Entry::Vacant(slot) => {
                // The id is only taken once the code is known to be free, so
                // conflicts never burn an id.
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let stored = record.into_record(id, Timestamp::now());
                slot.insert(stored.clone());
                stored
            }
        };

        self.by_id.insert(stored.id, stored.short_code.clone());
        self.by_url
            .entry(stored.original_url.clone())
            .and_modify(|lowest| *lowest = (*lowest).min(stored.id))
            .or_insert(stored.id);

        trace!(id = stored.id, code = %stored.short_code, "Inserted record in memory");
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>> {
        let Some(code) = self.by_id.get(&id).map(|code| code.clone()) else {
            return Ok(None);
        };
        Ok(self.by_code.get(&code).map(|record| record.clone()))
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.by_code.get(code).map(|record| record.clone()))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let Some(id) = self.by_url.get(original_url).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }
}
