use crate::connect::{retry_connect, with_timeout, ConnectPolicy};
use async_trait::async_trait;
use folio_core::error::Result;
use folio_core::{
    ContactMessage, ContactRepository, ReadRepository, Repository, Retention, ShortCode,
    ShortUrlRecord, StorageError,
};
use jiff::Timestamp;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::debug;

const SHORT_URLS_DDL: &str = include_str!("../ddl/mysql/short_urls.sql");
const CONTACT_MESSAGES_DDL: &str = include_str!("../ddl/mysql/contact_messages.sql");

/// MySQL implementation of the store traits.
///
/// Uniqueness of `short_code` is enforced by a unique index, so a racing
/// insert of the same code surfaces as [`StorageError::Conflict`]. MySQL has
/// no native row TTL: reads filter on `created_at`, inserts reclaim an
/// expired row holding the same code, and [`Repository::purge_expired`]
/// deletes expired rows in bulk. Timestamps are stored as unix milliseconds.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
    retention: Retention,
    op_timeout: Duration,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool, retention: Retention, op_timeout: Duration) -> Self {
        Self {
            pool,
            retention,
            op_timeout,
        }
    }

    /// Opens a connection pool, retrying with backoff as the policy allows.
    pub async fn connect(
        database_url: &str,
        retention: Retention,
        policy: &ConnectPolicy,
    ) -> Result<Self> {
        let acquire_timeout = policy.op_timeout;
        let pool = retry_connect(policy, "mysql", move || async move {
            MySqlPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(acquire_timeout)
                .connect(database_url)
                .await
                .map_err(map_sqlx_error)
        })
        .await?;

        Ok(Self::new(pool, retention, policy.op_timeout))
    }

    /// Creates the tables this repository needs if they are missing.
    pub async fn migrate(&self) -> Result<()> {
        for ddl in [SHORT_URLS_DDL, CONTACT_MESSAGES_DDL] {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        debug!("mysql schema ready");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", millis))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, code: &ShortCode, now: Timestamp) -> Result<Option<ShortUrlRecord>> {
        let cutoff = self.retention.cutoff(now).as_millisecond();

        with_timeout(self.op_timeout, async {
            let row = sqlx::query(
                r#"
                SELECT original_url, created_at
                FROM short_urls
                WHERE short_code = ?
                  AND created_at > ?
                LIMIT 1
                "#,
            )
            .bind(code.as_str())
            .bind(cutoff)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            let Some(row) = row else {
                return Ok(None);
            };

            let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
            let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

            Ok(Some(ShortUrlRecord {
                original_url,
                short_code: code.clone(),
                created_at: parse_created_at(created_at)?,
            }))
        })
        .await
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, record: ShortUrlRecord) -> Result<()> {
        let cutoff = self.retention.cutoff(record.created_at).as_millisecond();

        with_timeout(self.op_timeout, async {
            // An expired row still occupies the unique index until purged.
            sqlx::query(
                r#"
                DELETE FROM short_urls
                WHERE short_code = ?
                  AND created_at <= ?
                "#,
            )
            .bind(record.short_code.as_str())
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            let result = sqlx::query(
                r#"
                INSERT INTO short_urls (short_code, original_url, created_at)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(record.short_code.as_str())
            .bind(&record.original_url)
            .bind(record.created_at.as_millisecond())
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => Ok(()),
                Err(err) if is_unique_violation(&err) => {
                    Err(StorageError::Conflict(record.short_code.to_string()))
                }
                Err(err) => Err(map_sqlx_error(err)),
            }
        })
        .await
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<u64> {
        let cutoff = self.retention.cutoff(now).as_millisecond();

        with_timeout(self.op_timeout, async {
            let result = sqlx::query("DELETE FROM short_urls WHERE created_at <= ?")
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
            Ok(result.rows_affected())
        })
        .await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ContactRepository for MySqlRepository {
    async fn save(&self, message: ContactMessage) -> Result<()> {
        with_timeout(self.op_timeout, async {
            sqlx::query(
                r#"
                INSERT INTO contact_messages (name, email, subject, message, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.subject)
            .bind(&message.message)
            .bind(message.created_at.as_millisecond())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
            Ok(())
        })
        .await
    }
}
