use folio_core::error::Result;
use folio_core::StorageError;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

/// How store connections are established and how long operations may take.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ConnectPolicy {
    /// Connection attempts before giving up, at least one.
    #[builder(default = 3)]
    pub attempts: u32,
    /// Delay after the first failed attempt; doubles after each failure.
    #[builder(default = Duration::from_millis(200))]
    pub initial_backoff: Duration,
    #[builder(default = Duration::from_secs(2))]
    pub max_backoff: Duration,
    /// Upper bound for a single connection attempt or store operation.
    #[builder(default = Duration::from_secs(5))]
    pub op_timeout: Duration,
}

impl Default for ConnectPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Runs `connect` until it succeeds or the policy's attempts are used up,
/// sleeping with exponential backoff in between. Returns the last error.
pub(crate) async fn retry_connect<T, F, Fut>(
    policy: &ConnectPolicy,
    backend: &'static str,
    mut connect: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut backoff = policy.initial_backoff;
    let mut attempt = 1;

    loop {
        match with_timeout(policy.op_timeout, connect()).await {
            Ok(handle) => {
                info!(backend, attempt, "connected to store");
                return Ok(handle);
            }
            Err(err) if attempt < attempts => {
                warn!(
                    backend,
                    attempt,
                    error = %err,
                    backoff_ms = backoff.as_millis() as u64,
                    "store connection failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(policy.max_backoff);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Bounds a store operation; an elapsed deadline becomes [`StorageError::Timeout`].
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(format!(
            "no response within {}ms",
            limit.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(attempts: u32) -> ConnectPolicy {
        ConnectPolicy::builder()
            .attempts(attempts)
            .initial_backoff(Duration::from_millis(1))
            .max_backoff(Duration::from_millis(2))
            .op_timeout(Duration::from_millis(50))
            .build()
    }

    #[test]
    fn default_policy() {
        let policy = ConnectPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.op_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);

        let value = retry_connect(&fast_policy(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StorageError::Unavailable("refused".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_policy_attempts() {
        let calls = AtomicU32::new(0);

        let err = retry_connect(&fast_policy(2), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(StorageError::Unavailable("refused".to_string())) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);

        let _ = retry_connect(&fast_policy(0), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(StorageError::Unavailable("refused".to_string())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hung_attempt_times_out() {
        let err = retry_connect(&fast_policy(1), "test", || {
            std::future::pending::<Result<()>>()
        })
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::Timeout(_)));
    }
}
