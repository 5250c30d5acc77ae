//! The short-code allocator.
//!
//! [`ShortenerService`] turns a long URL into a fresh short code, persists
//! the mapping and composes the shareable redirect URL.

pub mod service;

pub use service::{ShortenerService, ShortenerSettings, DEFAULT_MAX_ATTEMPTS};
