use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The 62 symbols a short code may contain.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of system-generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

const MAX_LENGTH: usize = 32;

/// A validated short code identifier for a shortened URL.
///
/// Short codes are 1-32 characters long and contain only ASCII letters
/// and digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. generators drawing from [`ALPHABET`]).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/s/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.is_empty() || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between 1 and {}, got {}",
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only letters and digits: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_62_unique_symbols() {
        let unique: std::collections::HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
        assert!(ALPHABET.iter().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("a").is_ok());
        assert!(ShortCode::new("Ab3dE9").is_ok());
        assert!(ShortCode::new("doesNotExist").is_ok());
        assert!(ShortCode::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn empty_or_too_long() {
        assert!(ShortCode::new("").is_err());
        assert!(ShortCode::new("a".repeat(33)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("abc-def").is_err());
        assert!(ShortCode::new("abc_def").is_err());
        assert!(ShortCode::new("abc/def").is_err());
        assert!(ShortCode::new("ab cd").is_err());
        assert!(ShortCode::new("äbc").is_err());
    }

    #[test]
    fn to_url_uses_redirect_prefix() {
        let code = ShortCode::new("Ab3dE9").unwrap();
        assert_eq!(code.to_url("https://folio.dev"), "https://folio.dev/s/Ab3dE9");
        assert_eq!(code.to_url("https://folio.dev/"), "https://folio.dev/s/Ab3dE9");
    }

    #[test]
    fn deserialize_validates() {
        let code: ShortCode = serde_json::from_str("\"Ab3dE9\"").unwrap();
        assert_eq!(code.as_str(), "Ab3dE9");
        assert!(serde_json::from_str::<ShortCode>("\"bad/code\"").is_err());
    }
}
