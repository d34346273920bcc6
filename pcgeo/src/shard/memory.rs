//! In-memory shard source for unit tests.

use std::cell::Cell;
use std::collections::HashMap;

use super::{PolygonTable, ShardError, ShardSource};
use crate::geometry::square;
use crate::postcode::ShardKey;

/// Shards keyed by prefix; absent prefixes are NotFound. Counts loads.
pub(crate) struct MemoryShards {
    shards: HashMap<String, Vec<&'static str>>,
    pub(crate) loads: Cell<usize>,
}

impl MemoryShards {
    pub(crate) fn new(shards: &[(&str, Vec<&'static str>)]) -> Self {
        Self {
            shards: shards
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            loads: Cell::new(0),
        }
    }
}

impl ShardSource for MemoryShards {
    fn load(&self, key: &ShardKey) -> Result<PolygonTable, ShardError> {
        self.loads.set(self.loads.get() + 1);
        let postcodes = self.shards.get(key.as_str()).ok_or(ShardError::NotFound {
            key: key.clone(),
            path: key.relative_path(),
        })?;
        let mut table = PolygonTable::new(key.clone());
        for (i, pc) in postcodes.iter().enumerate() {
            table.insert(*pc, square(i as f64, 0.0));
        }
        Ok(table)
    }
}
