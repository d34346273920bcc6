//! In-memory contents of one polygon shard.

use std::collections::HashMap;

use geo_types::MultiPolygon;

use crate::postcode::ShardKey;

/// All postcode polygons from a single shard.
///
/// When a shard lists a postcode more than once the first row is kept and the
/// repeat counted in [`PolygonTable::duplicates`].
#[derive(Debug, Clone)]
pub struct PolygonTable {
    key: ShardKey,
    rows: HashMap<String, MultiPolygon<f64>>,
    duplicates: usize,
    skipped: usize,
}

impl PolygonTable {
    /// Create an empty table for `key`.
    pub fn new(key: ShardKey) -> Self {
        Self {
            key,
            rows: HashMap::new(),
            duplicates: 0,
            skipped: 0,
        }
    }

    /// Add a row. Returns `false` if the postcode was already present.
    pub fn insert(&mut self, postcode: impl Into<String>, polygon: MultiPolygon<f64>) -> bool {
        let postcode = postcode.into();
        if self.rows.contains_key(&postcode) {
            self.duplicates += 1;
            return false;
        }
        self.rows.insert(postcode, polygon);
        true
    }

    /// Record a row that could not be used (null postcode or non-polygon shape).
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Exact-match lookup.
    pub fn get(&self, postcode: &str) -> Option<&MultiPolygon<f64>> {
        self.rows.get(postcode)
    }

    /// The shard this table was loaded from.
    pub fn key(&self) -> &ShardKey {
        &self.key
    }

    /// Number of distinct postcodes.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the shard held no usable rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Repeated postcode rows ignored while loading.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Rows ignored because they had no postcode or no polygon geometry.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::square;

    fn key() -> ShardKey {
        ShardKey::from_postcode("CB30DG").unwrap()
    }

    #[test]
    fn test_insert_and_exact_lookup() {
        let mut table = PolygonTable::new(key());
        assert!(table.insert("CB30DG", square(0.0, 0.0)));
        assert_eq!(table.get("CB30DG"), Some(&square(0.0, 0.0)));
        assert!(table.get("CB3 0DG").is_none());
        assert!(table.get("cb30dg").is_none());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut table = PolygonTable::new(key());
        table.insert("CB30DG", square(0.0, 0.0));
        assert!(!table.insert("CB30DG", square(9.0, 9.0)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.duplicates(), 1);
        assert_eq!(table.get("CB30DG"), Some(&square(0.0, 0.0)));
    }

    #[test]
    fn test_skipped_counter() {
        let mut table = PolygonTable::new(key());
        table.record_skipped();
        table.record_skipped();
        assert_eq!(table.skipped(), 2);
        assert!(table.is_empty());
        assert_eq!(table.key().as_str(), "cb");
    }
}
