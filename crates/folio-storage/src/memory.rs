use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use folio_core::error::Result;
use folio_core::{
    ContactMessage, ContactRepository, ReadRepository, Repository, Retention, ShortCode,
    ShortUrlRecord, StorageError,
};
use jiff::Timestamp;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// In-memory implementation of the store traits using DashMap.
///
/// Expired records are evicted lazily when read, and in bulk by
/// [`Repository::purge_expired`]. Clones share the same underlying maps.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    urls: Arc<DashMap<String, ShortUrlRecord>>,
    contacts: Arc<RwLock<Vec<ContactMessage>>>,
    retention: Retention,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository with the default 30 day retention.
    pub fn new() -> Self {
        Self::with_retention(Retention::default())
    }

    pub fn with_retention(retention: Retention) -> Self {
        Self {
            urls: Arc::new(DashMap::new()),
            contacts: Arc::new(RwLock::new(Vec::new())),
            retention,
        }
    }

    /// Number of physically stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Snapshot of the stored contact messages, oldest first.
    pub fn contact_messages(&self) -> Vec<ContactMessage> {
        self.contacts.read().clone()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode, now: Timestamp) -> Result<Option<ShortUrlRecord>> {
        let key = code.as_str();

        let Some(record) = self.urls.get(key).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };

        if record.is_expired(&self.retention, now) {
            self.urls
                .remove_if(key, |_, stored| stored.is_expired(&self.retention, now));
            trace!(code = %code, "evicted expired record");
            return Ok(None);
        }

        Ok(Some(record))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: ShortUrlRecord) -> Result<()> {
        let now = record.created_at;

        // The entry guard holds the shard lock, so check-and-insert is atomic.
        match self.urls.entry(record.short_code.as_str().to_owned()) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_expired(&self.retention, now) {
                    return Err(StorageError::Conflict(record.short_code.to_string()));
                }
                occupied.insert(record);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(record);
            }
        }

        Ok(())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<u64> {
        let mut removed = 0;
        self.urls.retain(|_, record| {
            let keep = !record.is_expired(&self.retention, now);
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

#[async_trait]
impl ContactRepository for InMemoryRepository {
    async fn save(&self, message: ContactMessage) -> Result<()> {
        self.contacts.write().push(message);
        Ok(())
    }
}
