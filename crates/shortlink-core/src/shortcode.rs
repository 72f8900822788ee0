use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 32;

/// A short code that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid short code '{code}': {reason}")]
pub struct InvalidShortCode {
    pub code: String,
    pub reason: String,
}

/// The compact identifier substituted for a long URL.
///
/// Codes are 3-32 characters long and contain only URL-safe characters
/// (`[a-zA-Z0-9_-]`), so they can be used verbatim as a path segment or a
/// cache key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl AsRef<str>) -> Result<Self, InvalidShortCode> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Encodes raw generator bytes as a base58 short code.
    ///
    /// Base58 output is always alphanumeric. Callers must pass at least three
    /// bytes so the encoded form is long enough to validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use shortlink_core::ShortCode;
    ///
    /// let code = ShortCode::from_bytes([0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);
    /// assert!(ShortCode::new(code.as_str()).is_ok());
    /// ```
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Self {
        Self(SmolStr::new(bs58::encode(bytes).into_string()))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), InvalidShortCode> {
        let invalid = |reason: String| InvalidShortCode {
            code: code.to_string(),
            reason,
        };

        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(invalid(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid(
                "must contain only alphanumeric characters, hyphens, or underscores".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShortCode {
    type Err = InvalidShortCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = InvalidShortCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0.to_string()
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("abC12").is_ok());
        assert!(ShortCode::new("Abc-123_xyz").is_ok());
        assert!(ShortCode::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn too_short() {
        assert!(ShortCode::new("ab").is_err());
        assert!(ShortCode::new("").is_err());
    }

    #[test]
    fn too_long() {
        assert!(ShortCode::new("a".repeat(33)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("abc def").is_err());
        assert!(ShortCode::new("abc/def").is_err());
        assert!(ShortCode::new("favicon.ico").is_err());
    }

    #[test]
    fn from_bytes_is_base58() {
        let code = ShortCode::from_bytes([0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);
        assert_eq!(
            code.as_str(),
            bs58::encode([0x10, 0x20, 0x30, 0x40, 0x50, 0x60]).into_string()
        );
        assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn from_bytes_keeps_leading_zeros_distinct() {
        let a = ShortCode::from_bytes([0, 0, 0, 0, 0, 1]);
        let b = ShortCode::from_bytes([0, 0, 0, 0, 1, 0]);
        assert_ne!(a, b);
    }

    #[test]
    fn deserialize_validates() {
        let parsed: Result<ShortCode, _> = serde_json::from_str("\"ok-code\"");
        assert!(parsed.is_ok());

        let rejected: Result<ShortCode, _> = serde_json::from_str("\"no/slash\"");
        assert!(rejected.is_err());
    }
}
