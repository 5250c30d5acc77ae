//! Mapping store backends for the folio link shortener.
//!
//! Every backend implements [`Repository`] for short URL records and
//! [`ContactRepository`] for contact messages, enforces the configured
//! [`Retention`](folio_core::Retention) on reads, and rejects inserts that
//! would collide with a live record.

pub mod connect;
pub mod memory;
pub mod mysql;
pub mod redis;

pub use connect::ConnectPolicy;
pub use folio_core::error::Result;
pub use folio_core::{ContactRepository, ReadRepository, Repository, StorageError};
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use self::redis::RedisRepository;
