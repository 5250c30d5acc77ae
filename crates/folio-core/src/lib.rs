//! Core types and traits for the folio link shortener.
//!
//! This crate provides the shared vocabulary used by the allocator, the
//! redirect resolver, the storage backends and the HTTP gateway.

pub mod clock;
pub mod contact;
pub mod error;
pub mod repository;
pub mod retention;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, FixedClock, SystemClock};
pub use contact::{ContactMessage, ContactRepository};
pub use error::{ContactError, CoreError, RedirectorError, ShortenerError, StorageError};
pub use repository::{ReadRepository, Repository, ShortUrlRecord};
pub use retention::Retention;
pub use shortcode::ShortCode;
pub use shortener::{Allocation, Redirector, Shortener};
