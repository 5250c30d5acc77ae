use crate::error::Result;
use crate::retention::Retention;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored short URL mapping.
///
/// Records are written once by the allocator and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlRecord {
    /// The original URL that was shortened.
    pub original_url: String,
    /// The code the record is reachable by.
    pub short_code: ShortCode,
    /// When the record was created; expiry is measured from here.
    pub created_at: Timestamp,
}

impl ShortUrlRecord {
    pub fn is_expired(&self, retention: &Retention, now: Timestamp) -> bool {
        retention.is_expired(self.created_at, now)
    }
}

/// A read-only view of the mapping store.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing the redirect resolver to have read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the live record for a given short code.
    /// Returns `None` if the code does not exist or has expired as of `now`.
    async fn get(&self, code: &ShortCode, now: Timestamp) -> Result<Option<ShortUrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record. Returns `Err(Conflict)` if a live record already
    /// holds the same code. An expired record under the same code is replaced.
    async fn insert(&self, record: ShortUrlRecord) -> Result<()>;

    /// Physically removes records that expired as of `now` and returns how
    /// many were removed. Backends with native TTLs return `0`.
    async fn purge_expired(&self, now: Timestamp) -> Result<u64>;

    /// Releases the backend's connections. Further calls may fail.
    async fn close(&self) {}
}
