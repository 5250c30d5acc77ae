use folio_core::{Clock, Repository};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, trace, warn};

/// Spawns a task that deletes expired records every `every`.
///
/// Reads already hide expired records; this only reclaims space. Abort the
/// returned handle to stop it.
pub fn spawn_expiry_sweeper<R: Repository>(
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match repository.purge_expired(clock.now()).await {
                Ok(0) => trace!("no expired short urls to purge"),
                Ok(removed) => info!(removed, "purged expired short urls"),
                Err(err) => warn!(error = %err, "failed to purge expired short urls"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{FixedClock, ReadRepository, Retention, ShortCode, ShortUrlRecord};
    use folio_storage::InMemoryRepository;
    use jiff::{SignedDuration, Timestamp};

    #[tokio::test]
    async fn sweeper_purges_expired_records() {
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        let retention = Retention::from_duration(SignedDuration::from_hours(1));
        let repo = Arc::new(InMemoryRepository::with_retention(retention));
        let clock = Arc::new(FixedClock::new(start));

        for (code, age_secs) in [("old001", 7_200), ("new001", 60)] {
            repo.insert(ShortUrlRecord {
                original_url: "https://example.com".to_string(),
                short_code: ShortCode::new_unchecked(code),
                created_at: start - SignedDuration::from_secs(age_secs),
            })
            .await
            .unwrap();
        }

        let handle = spawn_expiry_sweeper(repo.clone(), clock.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(repo.len(), 1);
        assert!(repo
            .get(&ShortCode::new_unchecked("new001"), start)
            .await
            .unwrap()
            .is_some());
    }
}
