pub mod random;

pub use random::RandomGenerator;

use folio_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is not their concern: the allocator detects collisions at
/// write time and asks for another candidate.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate short code.
    fn generate(&self) -> ShortCode;
}
