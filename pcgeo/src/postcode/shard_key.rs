//! Shard key derivation from postcode area prefixes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use super::format::PostcodeError;

/// Directory holding shards for single-letter postcode areas.
pub const ONE_LETTER_DIR: &str = "one_letter_pc_code";

/// Directory holding shards for two-letter postcode areas.
pub const TWO_LETTER_DIR: &str = "two_letter_pc_code";

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]{1,2})\d").expect("prefix pattern is valid"))
}

/// Identifies the polygon shard containing a postcode.
///
/// The key is the lowercase one- or two-letter area prefix of the postcode.
/// Single-letter keys and two-letter keys live under different directory
/// layouts, see [`ShardKey::relative_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardKey(String);

impl ShardKey {
    /// Derive the shard key from a raw postcode string.
    ///
    /// Matches the leading one or two ASCII letters immediately followed by a
    /// digit and lowercases them. Fails when no such prefix exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use pcgeo::postcode::ShardKey;
    ///
    /// assert_eq!(ShardKey::from_postcode("CB3 0DG").unwrap().as_str(), "cb");
    /// assert_eq!(ShardKey::from_postcode("N1 9GU").unwrap().as_str(), "n");
    /// assert!(ShardKey::from_postcode("123ABC").is_err());
    /// assert!(ShardKey::from_postcode("ABC1").is_err());
    /// ```
    pub fn from_postcode(postcode: &str) -> Result<Self, PostcodeError> {
        prefix_pattern()
            .captures(postcode)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_ascii_lowercase()))
            .ok_or_else(|| PostcodeError::InvalidFormat(postcode.to_string()))
    }

    /// Build a key from a postcode already known to match the strict grammar.
    pub(super) fn from_validated(postcode: &str) -> Self {
        let prefix: String = postcode
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self(prefix)
    }

    /// The lowercase prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for single-letter areas such as `b` or `n`.
    pub fn is_single_letter(&self) -> bool {
        self.0.len() == 1
    }

    /// Path of the shard file relative to the shapefile root.
    ///
    /// ```text
    /// one_letter_pc_code/<key>/<key>.shp   (single letter)
    /// two_letter_pc_code/<key>.shp         (two letters)
    /// ```
    pub fn relative_path(&self) -> PathBuf {
        let file = format!("{}.shp", self.0);
        if self.is_single_letter() {
            PathBuf::from(ONE_LETTER_DIR).join(&self.0).join(file)
        } else {
            PathBuf::from(TWO_LETTER_DIR).join(file)
        }
    }

    /// Full path of the shard file under `root`.
    pub fn path_in(&self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
