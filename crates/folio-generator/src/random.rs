use crate::Generator;
use folio_core::shortcode::{ALPHABET, DEFAULT_CODE_LENGTH};
use folio_core::ShortCode;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A random short code generator.
///
/// Every character is an independent uniform draw from the 62-symbol
/// alphanumeric alphabet, giving `62^length` possible codes.
#[derive(Debug)]
pub struct RandomGenerator {
    length: usize,
    rng: Mutex<StdRng>,
}

impl RandomGenerator {
    /// Creates a generator producing codes of the default length (6),
    /// seeded from the operating system.
    pub fn new() -> Self {
        Self::with_length(DEFAULT_CODE_LENGTH)
    }

    /// Creates an OS-seeded generator producing codes of `length` characters.
    ///
    /// `length` is clamped to at least 1.
    pub fn with_length(length: usize) -> Self {
        Self {
            length: length.max(1),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a deterministic generator. Two generators with the same seed
    /// and length produce the same sequence of codes.
    pub fn seeded(length: usize, seed: u64) -> Self {
        Self {
            length: length.max(1),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        let mut rng = self.rng.lock();
        let code: String = (0..self.length)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_fixed_length_alphanumeric_codes() {
        let generator = RandomGenerator::new();

        for _ in 0..1_000 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
            assert!(ShortCode::new(code.as_str()).is_ok());
        }
    }

    #[test]
    fn custom_length() {
        let generator = RandomGenerator::with_length(10);
        assert_eq!(generator.generate().as_str().len(), 10);
        assert_eq!(RandomGenerator::with_length(0).length(), 1);
    }

    #[test]
    fn ten_thousand_codes_are_distinct() {
        let generator = RandomGenerator::seeded(6, 2024);
        let codes: HashSet<_> = (0..10_000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 10_000);
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = RandomGenerator::seeded(6, 42);
        let b = RandomGenerator::seeded(6, 42);

        for _ in 0..5 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn draws_cover_the_whole_alphabet() {
        let generator = RandomGenerator::seeded(32, 7);
        let seen: HashSet<u8> = (0..200)
            .flat_map(|_| generator.generate().as_str().bytes().collect::<Vec<_>>())
            .collect();
        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
