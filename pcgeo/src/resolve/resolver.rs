//! Resolution engine.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use super::summary::ResolutionSummary;
use crate::geometry::{GeometryRecord, GeometryTable};
use crate::postcode::{Postcode, ShardKey};
use crate::shard::{ShardCache, ShardCacheStats, ShardError, ShardSource};

/// Why a postcode produced no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnresolvedReason {
    /// The string is not a well-formed postcode.
    InvalidFormat,
    /// The postcode's shard is missing or unreadable.
    ShardNotFound,
    /// The shard loaded but has no row for this postcode.
    PostcodeNotInShard,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnresolvedReason::InvalidFormat => "invalid format",
            UnresolvedReason::ShardNotFound => "shard not found",
            UnresolvedReason::PostcodeNotInShard => "not found in shard",
        };
        f.write_str(text)
    }
}

/// A postcode that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPostcode {
    /// Postcode as supplied (surrounding whitespace trimmed).
    pub postcode: String,
    /// Failure reason.
    pub reason: UnresolvedReason,
    /// Shard consulted, if the postcode got that far.
    pub shard: Option<ShardKey>,
}

/// Output of one resolution pass.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Resolved rows in input order.
    pub table: GeometryTable,
    /// Unresolved postcodes in input order.
    pub unresolved: Vec<UnresolvedPostcode>,
    /// Each shard that failed to load, listed once.
    pub failed_shards: Vec<ShardError>,
    /// Number of distinct postcodes requested.
    pub requested: usize,
    /// Shard cache usage during the pass.
    pub cache_stats: ShardCacheStats,
}

impl Resolution {
    /// Aggregate counts and samples per failure reason.
    pub fn summary(&self) -> ResolutionSummary {
        ResolutionSummary::from_resolution(self)
    }

    /// True when nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Resolves postcodes to polygons from a [`ShardSource`].
///
/// Each call to [`resolve`](Self::resolve) uses a fresh [`ShardCache`];
/// nothing is retained between calls.
///
/// # Example
///
/// ```no_run
/// use pcgeo::resolve::GeometryResolver;
/// use pcgeo::shard::ShapefileShards;
///
/// let resolver = GeometryResolver::new(ShapefileShards::new("/data/codepoint-poly"));
/// let resolution = resolver.resolve(["CB3 0DG", "EH1 1YZ"]);
/// println!("{} resolved", resolution.table.len());
/// ```
#[derive(Debug, Clone)]
pub struct GeometryResolver<S> {
    source: S,
}

impl<S: ShardSource> GeometryResolver<S> {
    /// Create a resolver over `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying shard source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve postcodes with a cache scoped to this call.
    pub fn resolve<I>(&self, postcodes: I) -> Resolution
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut cache = ShardCache::new(&self.source);
        resolve_with(&mut cache, postcodes)
    }
}

/// Resolve postcodes through a caller-owned cache.
///
/// Lets a caller keep shards loaded across several passes. Input is trimmed
/// and deduplicated, keeping first-seen order.
pub fn resolve_with<S, I>(cache: &mut ShardCache<'_, S>, postcodes: I) -> Resolution
where
    S: ShardSource + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut table = GeometryTable::new();
    let mut unresolved = Vec::new();
    let mut failed_keys = HashSet::new();
    let mut failed_shards = Vec::new();

    for raw in postcodes {
        let raw = raw.as_ref().trim();
        if !seen.insert(raw.to_string()) {
            continue;
        }

        let postcode = match Postcode::parse(raw) {
            Ok(pc) => pc,
            Err(_) => {
                debug!(postcode = raw, "Invalid postcode format");
                unresolved.push(UnresolvedPostcode {
                    postcode: raw.to_string(),
                    reason: UnresolvedReason::InvalidFormat,
                    shard: None,
                });
                continue;
            }
        };

        let key = postcode.shard_key();
        match cache.get(&key) {
            Ok(shard) => match shard.get(postcode.as_str()) {
                Some(polygon) => {
                    table.push(GeometryRecord::new(postcode.as_str(), polygon.clone()));
                }
                None => {
                    debug!(postcode = raw, shard = %key, "Postcode not found in shard");
                    unresolved.push(UnresolvedPostcode {
                        postcode: raw.to_string(),
                        reason: UnresolvedReason::PostcodeNotInShard,
                        shard: Some(key),
                    });
                }
            },
            Err(e) => {
                if failed_keys.insert(key.clone()) {
                    failed_shards.push(e);
                }
                unresolved.push(UnresolvedPostcode {
                    postcode: raw.to_string(),
                    reason: UnresolvedReason::ShardNotFound,
                    shard: Some(key),
                });
            }
        }
    }

    let resolution = Resolution {
        table,
        unresolved,
        failed_shards,
        requested: seen.len(),
        cache_stats: cache.stats(),
    };

    info!(
        requested = resolution.requested,
        resolved = resolution.table.len(),
        unresolved = resolution.unresolved.len(),
        shards_loaded = resolution.cache_stats.loads,
        shards_failed = resolution.failed_shards.len(),
        "Postcode resolution complete"
    );

    resolution
}
