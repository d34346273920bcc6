//! Per-pass shard memoization.

use std::collections::HashMap;

use tracing::warn;

use super::source::{ShardError, ShardSource};
use super::table::PolygonTable;
use crate::postcode::ShardKey;

/// Counters describing how a [`ShardCache`] was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShardCacheStats {
    /// Calls that reached the underlying source.
    pub loads: usize,
    /// Calls answered from memory, successful or failed.
    pub hits: usize,
    /// Loads that failed.
    pub failures: usize,
}

/// Memoizes shard loads for the lifetime of one resolution pass.
///
/// Both successful tables and failures are remembered, so a missing shard is
/// attempted once and every later postcode in that shard fails fast with the
/// same error. The cache is not persisted and is not shared across threads;
/// for parallel work, [`preload`](Self::preload) the shards up front and
/// hand out read-only references, or give each worker its own cache.
pub struct ShardCache<'s, S: ShardSource + ?Sized> {
    source: &'s S,
    shards: HashMap<ShardKey, Result<PolygonTable, ShardError>>,
    stats: ShardCacheStats,
}

impl<'s, S: ShardSource + ?Sized> ShardCache<'s, S> {
    /// Create an empty cache over `source`.
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            shards: HashMap::new(),
            stats: ShardCacheStats::default(),
        }
    }

    /// Get a shard, loading it on first use.
    pub fn get(&mut self, key: &ShardKey) -> Result<&PolygonTable, ShardError> {
        if self.shards.contains_key(key) {
            self.stats.hits += 1;
        } else {
            self.stats.loads += 1;
            let loaded = self.source.load(key);
            if let Err(e) = &loaded {
                self.stats.failures += 1;
                warn!(shard = %key, error = %e, "Shard unavailable, skipping its postcodes");
            }
            self.shards.insert(key.clone(), loaded);
        }

        match &self.shards[key] {
            Ok(table) => Ok(table),
            Err(e) => Err(e.clone()),
        }
    }

    /// Load every listed shard that is not already cached.
    pub fn preload<'k>(&mut self, keys: impl IntoIterator<Item = &'k ShardKey>) {
        for key in keys {
            if !self.shards.contains_key(key) {
                let _ = self.get(key);
            }
        }
    }

    /// Shards that failed to load, one entry per shard, sorted by key.
    pub fn failures(&self) -> Vec<&ShardError> {
        let mut failed: Vec<&ShardError> = self
            .shards
            .values()
            .filter_map(|entry| entry.as_ref().err())
            .collect();
        failed.sort_by(|a, b| a.key().cmp(b.key()));
        failed
    }

    /// Number of shards attempted so far.
    pub fn len(&self) -> usize {
        self.shards.len()
    }

    /// True before any shard was requested.
    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Usage counters.
    pub fn stats(&self) -> ShardCacheStats {
        self.stats
    }
}
