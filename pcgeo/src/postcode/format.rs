//! Strict UK postcode format validation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::shard_key::ShardKey;

/// Postcode parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostcodeError {
    /// Input does not follow the UK postcode grammar.
    #[error("Invalid postcode format: '{0}'")]
    InvalidFormat(String),
}

fn postcode_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z]{1,2}[0-9]{1,2}[A-Z]?\s?[0-9][A-Z]{2}$")
            .expect("postcode pattern is valid")
    })
}

/// Returns true if `value` matches the strict postcode grammar as-is.
///
/// No case folding or whitespace repair is applied.
pub fn is_valid_postcode(value: &str) -> bool {
    postcode_pattern().is_match(value)
}

/// A validated UK postcode.
///
/// Accepts `[A-Z]{1,2}[0-9]{1,2}[A-Z]?\s?[0-9][A-Z]{2}` after trimming
/// surrounding whitespace. Lowercase input and letter/digit confusion
/// (`O` for `0`) are rejected rather than corrected.
///
/// # Examples
///
/// ```
/// use pcgeo::postcode::Postcode;
///
/// assert_eq!(Postcode::parse(" CB30DG ").unwrap().as_str(), "CB30DG");
/// assert!(Postcode::parse("cb3odg").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Postcode(String);

impl Postcode {
    /// Parse and validate a postcode string.
    pub fn parse(input: &str) -> Result<Self, PostcodeError> {
        let trimmed = input.trim();
        if is_valid_postcode(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(PostcodeError::InvalidFormat(input.to_string()))
        }
    }

    /// The postcode text exactly as it will be matched against shard rows.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The shard holding this postcode's polygon.
    pub fn shard_key(&self) -> ShardKey {
        // A validated postcode always starts with 1-2 letters then a digit.
        ShardKey::from_validated(&self.0)
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Postcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Postcode {
    type Err = PostcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_postcode() {
        let pc = Postcode::parse("CB30DG").unwrap();
        assert_eq!(pc.as_str(), "CB30DG");
    }

    #[test]
    fn test_parse_spaced_postcode() {
        let pc = Postcode::parse("CB3 0DG").unwrap();
        assert_eq!(pc.as_str(), "CB3 0DG");
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let pc = Postcode::parse("  SW1A 1AA\t").unwrap();
        assert_eq!(pc.as_str(), "SW1A 1AA");
    }

    #[test]
    fn test_parse_single_letter_area() {
        assert!(Postcode::parse("B1 1AA").is_ok());
        assert!(Postcode::parse("M60 1QD").is_ok());
    }

    #[test]
    fn test_rejects_leading_digits() {
        assert_eq!(
            Postcode::parse("123ABC"),
            Err(PostcodeError::InvalidFormat("123ABC".to_string()))
        );
    }

    #[test]
    fn test_rejects_lowercase() {
        assert!(Postcode::parse("cb3 0dg").is_err());
    }

    #[test]
    fn test_rejects_letter_digit_confusion() {
        assert!(Postcode::parse("cb3odg").is_err());
        assert!(Postcode::parse("CB3ODG").is_err());
    }

    #[test]
    fn test_rejects_double_space() {
        assert!(Postcode::parse("CB3  0DG").is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Postcode::parse("").is_err());
        assert!(Postcode::parse("   ").is_err());
    }

    #[test]
    fn test_shard_key_from_postcode() {
        assert_eq!(Postcode::parse("CB30DG").unwrap().shard_key().as_str(), "cb");
        assert_eq!(Postcode::parse("B1 1AA").unwrap().shard_key().as_str(), "b");
    }

    #[test]
    fn test_from_str() {
        let pc: Postcode = "EH1 1YZ".parse().unwrap();
        assert_eq!(pc.to_string(), "EH1 1YZ");
    }
}
