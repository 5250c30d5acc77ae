use async_trait::async_trait;
use folio_core::{
    Allocation, Clock, Repository, ShortUrlRecord, Shortener, ShortenerError, StorageError,
    SystemClock,
};
use folio_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Candidate codes tried before an allocation gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Public base address short URLs are composed on (`<base>/s/<code>`).
    #[builder(setter(into))]
    pub base_url: String,
    /// Upper bound on generate-and-insert rounds per allocation.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// Collisions are detected at write time: the repository rejects an insert
/// whose code is already held by a live record, and the service draws a new
/// candidate. A rejected candidate never leaves a record behind.
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: Arc<dyn Clock>,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: Arc<R>, generator: G, settings: ShortenerSettings) -> Self {
        Self::with_clock(repository, generator, settings, Arc::new(SystemClock))
    }

    /// Creates a service whose records are stamped by `clock`.
    pub fn with_clock(
        repository: Arc<R>,
        generator: G,
        settings: ShortenerSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn allocate(&self, original_url: &str) -> Result<Allocation, ShortenerError> {
        if original_url.trim().is_empty() {
            return Err(ShortenerError::Validation("URL is required".to_string()));
        }

        let max_attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let short_code = self.generator.generate();
            let record = ShortUrlRecord {
                original_url: original_url.to_string(),
                short_code: short_code.clone(),
                created_at: self.clock.now(),
            };

            match self.repository.insert(record).await {
                Ok(()) => {
                    let short_url = short_code.to_url(&self.settings.base_url);
                    info!(code = %short_code, attempt, "allocated short url");
                    return Ok(Allocation {
                        short_code,
                        short_url,
                        original_url: original_url.to_string(),
                    });
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %short_code, attempt, "short code collision, regenerating");
                }
                Err(err) => {
                    warn!(error = %err, attempt, "failed to persist short url");
                    return Err(err.into());
                }
            }
        }

        warn!(attempts = max_attempts, "no free short code found");
        Err(ShortenerError::GenerationExhausted {
            attempts: max_attempts,
        })
    }
}
