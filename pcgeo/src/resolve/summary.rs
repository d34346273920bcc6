//! Aggregated view of a resolution pass.

use std::fmt;

use super::resolver::{Resolution, UnresolvedReason};
use crate::postcode::ShardKey;

/// Maximum sample postcodes kept per failure reason.
pub const MAX_SAMPLES: usize = 5;

/// Count of postcodes failing for one reason, with a few examples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasonCount {
    pub count: usize,
    pub samples: Vec<String>,
}

impl ReasonCount {
    fn record(&mut self, postcode: &str) {
        self.count += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(postcode.to_string());
        }
    }
}

/// Counts and samples for a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// Distinct postcodes requested.
    pub requested: usize,
    /// Postcodes with geometry.
    pub resolved: usize,
    pub invalid_format: ReasonCount,
    pub shard_not_found: ReasonCount,
    pub not_in_shard: ReasonCount,
    /// Shards that failed to load.
    pub failed_shards: Vec<ShardKey>,
}

impl ResolutionSummary {
    pub(super) fn from_resolution(resolution: &Resolution) -> Self {
        let mut summary = Self {
            requested: resolution.requested,
            resolved: resolution.table.len(),
            failed_shards: resolution
                .failed_shards
                .iter()
                .map(|e| e.key().clone())
                .collect(),
            ..Self::default()
        };

        for entry in &resolution.unresolved {
            let bucket = match entry.reason {
                UnresolvedReason::InvalidFormat => &mut summary.invalid_format,
                UnresolvedReason::ShardNotFound => &mut summary.shard_not_found,
                UnresolvedReason::PostcodeNotInShard => &mut summary.not_in_shard,
            };
            bucket.record(&entry.postcode);
        }

        summary
    }

    /// Total unresolved postcodes.
    pub fn unresolved(&self) -> usize {
        self.invalid_format.count + self.shard_not_found.count + self.not_in_shard.count
    }

    /// Fraction of requested postcodes that resolved (0.0 when none requested).
    pub fn resolution_rate(&self) -> f64 {
        if self.requested == 0 {
            0.0
        } else {
            self.resolved as f64 / self.requested as f64
        }
    }
}

impl fmt::Display for ResolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} postcodes resolved ({:.1}%)",
            self.resolved,
            self.requested,
            self.resolution_rate() * 100.0
        )?;
        for (label, bucket) in [
            ("invalid format", &self.invalid_format),
            ("shard not found", &self.shard_not_found),
            ("not found in shard", &self.not_in_shard),
        ] {
            if bucket.count > 0 {
                write!(
                    f,
                    "; {} {} (e.g. {})",
                    bucket.count,
                    label,
                    bucket.samples.join(", ")
                )?;
            }
        }
        Ok(())
    }
}
