use crate::error::{RedirectorError, ShortenerError};
use crate::repository::ShortUrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// The outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub short_code: ShortCode,
    /// Fully qualified redirect URL (`<base>/s/<code>`).
    pub short_url: String,
    pub original_url: String,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Allocates a fresh short code for `original_url` and persists the mapping.
    async fn allocate(&self, original_url: &str) -> Result<Allocation, ShortenerError>;
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its stored record.
    /// Returns `None` if the code does not exist or has expired.
    async fn resolve(&self, code: &str) -> Result<Option<ShortUrlRecord>, RedirectorError>;
}
