use crate::connect::{retry_connect, with_timeout, ConnectPolicy};
use async_trait::async_trait;
use folio_core::error::Result;
use folio_core::{
    ContactMessage, ContactRepository, ReadRepository, Repository, Retention, ShortCode,
    ShortUrlRecord, StorageError,
};
use jiff::Timestamp;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{trace, warn};

const URL_KEY_PREFIX: &str = "folio:url:";
const CONTACT_MESSAGES_KEY: &str = "folio:contact:messages";

/// Generates the storage key for a short code.
fn url_key(code: &ShortCode) -> String {
    format!("{URL_KEY_PREFIX}{}", code.as_str())
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Query(message)
    }
}

/// Redis implementation of the store traits.
///
/// Records are stored as JSON under `folio:url:<code>` and written with
/// `SET NX EX`, so the existence check and the write are one atomic command
/// and Redis drops the key when the retention window ends. Contact messages
/// are appended to a list.
#[derive(Clone)]
pub struct RedisRepository {
    conn: ConnectionManager,
    retention: Retention,
    op_timeout: Duration,
}

impl std::fmt::Debug for RedisRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRepository")
            .field("retention", &self.retention)
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}

impl RedisRepository {
    /// Creates a repository over an existing connection manager.
    pub fn new(conn: ConnectionManager, retention: Retention, op_timeout: Duration) -> Self {
        Self {
            conn,
            retention,
            op_timeout,
        }
    }

    /// Connects to `redis_url`, retrying with backoff as the policy allows.
    ///
    /// The connection manager reconnects on its own after the initial
    /// connection succeeds.
    pub async fn connect(
        redis_url: &str,
        retention: Retention,
        policy: &ConnectPolicy,
    ) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StorageError::Unavailable(format!("invalid redis url: {e}")))?;

        let conn = retry_connect(policy, "redis", || {
            let client = client.clone();
            async move {
                client
                    .get_connection_manager()
                    .await
                    .map_err(|e| map_redis_error("connect", e))
            }
        })
        .await?;

        Ok(Self::new(conn, retention, policy.op_timeout))
    }
}

#[async_trait]
impl ReadRepository for RedisRepository {
    async fn get(&self, code: &ShortCode, now: Timestamp) -> Result<Option<ShortUrlRecord>> {
        let key = url_key(code);
        let mut conn = self.conn.clone();

        let raw = with_timeout(self.op_timeout, async {
            conn.get::<_, Option<String>>(&key)
                .await
                .map_err(|e| map_redis_error("get", e))
        })
        .await?;

        let Some(raw) = raw else {
            trace!(code = %code, "short code not in redis");
            return Ok(None);
        };

        let record: ShortUrlRecord = serde_json::from_str(&raw).map_err(|e| {
            StorageError::InvalidData(format!("record under '{key}' is not valid json: {e}"))
        })?;

        // The key TTL and the caller's clock can disagree by a few seconds.
        if record.is_expired(&self.retention, now) {
            trace!(code = %code, "redis record past retention");
            return Ok(None);
        }

        Ok(Some(record))
    }
}

#[async_trait]
impl Repository for RedisRepository {
    async fn insert(&self, record: ShortUrlRecord) -> Result<()> {
        let key = url_key(&record.short_code);
        let json = serde_json::to_string(&record)
            .map_err(|e| StorageError::InvalidData(format!("failed to serialize record: {e}")))?;
        let ttl_secs = self.retention.as_secs().max(1);
        let mut conn = self.conn.clone();

        let reply: redis::Value = with_timeout(self.op_timeout, async {
            redis::cmd("SET")
                .arg(&key)
                .arg(&json)
                .arg("NX")
                .arg("EX")
                .arg(ttl_secs)
                .query_async(&mut conn)
                .await
                .map_err(|e| map_redis_error("set", e))
        })
        .await?;

        match reply {
            redis::Value::Nil => Err(StorageError::Conflict(record.short_code.to_string())),
            _ => Ok(()),
        }
    }

    async fn purge_expired(&self, _now: Timestamp) -> Result<u64> {
        // Keys carry their own TTL.
        Ok(0)
    }
}

#[async_trait]
impl ContactRepository for RedisRepository {
    async fn save(&self, message: ContactMessage) -> Result<()> {
        let json = serde_json::to_string(&message).map_err(|e| {
            StorageError::InvalidData(format!("failed to serialize contact message: {e}"))
        })?;
        let mut conn = self.conn.clone();

        with_timeout(self.op_timeout, async {
            conn.rpush::<_, _, ()>(CONTACT_MESSAGES_KEY, json)
                .await
                .map_err(|e| {
                    warn!(error = %e, "failed to append contact message");
                    map_redis_error("rpush", e)
                })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_key_format() {
        let code = ShortCode::new_unchecked("Ab3dE9");
        assert_eq!(url_key(&code), "folio:url:Ab3dE9");
    }
}
