use async_trait::async_trait;
use folio_core::{
    Clock, ReadRepository, Redirector, RedirectorError, Retention, ShortCode, ShortUrlRecord,
    SystemClock,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Uses a read-only repository to fetch records. Expiry is checked again
/// here so a backend that hands back a stale record still never redirects.
pub struct RedirectorService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    retention: Retention,
}

impl<R: ReadRepository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository.
    pub fn new(repository: Arc<R>, retention: Retention) -> Self {
        Self::with_clock(repository, retention, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, retention: Retention, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            retention,
        }
    }
}

#[async_trait]
impl<R: ReadRepository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &str) -> Result<Option<ShortUrlRecord>, RedirectorError> {
        let Ok(code) = ShortCode::new(code) else {
            trace!(code, "malformed short code");
            return Ok(None);
        };

        let now = self.clock.now();
        trace!(code = %code, "resolving short code");

        match self.repository.get(&code, now).await? {
            Some(record) if record.is_expired(&self.retention, now) => {
                debug!(code = %code, "record has expired");
                Ok(None)
            }
            Some(record) => {
                debug!(code = %code, url = %record.original_url, "resolved short code");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }
}
