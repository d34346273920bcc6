//! Advisory check that a postcode column looks like standard UK postcodes.

use super::format::is_valid_postcode;

/// Number of leading non-null values inspected.
pub const QUALITY_SAMPLE_SIZE: usize = 10;

/// Minimum fraction of the sample that must match for a column to look standard.
pub const QUALITY_THRESHOLD: f64 = 0.5;

/// Result of inspecting a sample of postcode values.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeQuality {
    /// Number of values inspected.
    pub sampled: usize,
    /// Number of sampled values matching the postcode grammar.
    pub valid: usize,
}

impl PostcodeQuality {
    /// Fraction of the sample that was valid (0.0 for an empty sample).
    pub fn valid_fraction(&self) -> f64 {
        if self.sampled == 0 {
            0.0
        } else {
            self.valid as f64 / self.sampled as f64
        }
    }

    /// True when at least half of the sample matches. An empty sample passes.
    pub fn looks_standard(&self) -> bool {
        self.valid as f64 >= self.sampled as f64 * QUALITY_THRESHOLD
    }
}

/// Inspect the first [`QUALITY_SAMPLE_SIZE`] values.
///
/// Values are trimmed and uppercased before matching. This only decides
/// whether to warn; resolution itself never normalizes case.
pub fn assess_sample<'a, I>(values: I) -> PostcodeQuality
where
    I: IntoIterator<Item = &'a str>,
{
    let mut quality = PostcodeQuality {
        sampled: 0,
        valid: 0,
    };

    for value in values.into_iter().take(QUALITY_SAMPLE_SIZE) {
        quality.sampled += 1;
        if is_valid_postcode(&value.trim().to_uppercase()) {
            quality.valid += 1;
        }
    }

    quality
}
