//! Postcode geometry records and the ordered geometry table.
//!
//! A [`GeometryTable`] is the canonical `{POSTCODE, geometry}` schema shared
//! by shard resolution, regional persistence, and the join engine. Postcodes
//! are unique within a table and rows keep insertion order.

use std::collections::HashMap;

use geo_types::MultiPolygon;

/// Attribute name carrying the postcode in shapefiles and persisted sets.
pub const POSTCODE_FIELD: &str = "POSTCODE";

/// One resolved postcode and its boundary polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    /// Postcode text exactly as stored in the shard.
    pub postcode: String,
    /// Postcode boundary. Single polygons are stored as one-member multipolygons.
    pub polygon: MultiPolygon<f64>,
}

impl GeometryRecord {
    /// Create a new record.
    pub fn new(postcode: impl Into<String>, polygon: MultiPolygon<f64>) -> Self {
        Self {
            postcode: postcode.into(),
            polygon,
        }
    }
}

/// Insertion-ordered table of geometry records keyed by postcode.
#[derive(Debug, Clone, Default)]
pub struct GeometryTable {
    records: Vec<GeometryRecord>,
    index: HashMap<String, usize>,
}

impl GeometryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    ///
    /// Returns `false` and leaves the table unchanged when the postcode is
    /// already present.
    pub fn push(&mut self, record: GeometryRecord) -> bool {
        if self.index.contains_key(&record.postcode) {
            return false;
        }
        self.index
            .insert(record.postcode.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Look up the record for a postcode.
    pub fn get(&self, postcode: &str) -> Option<&GeometryRecord> {
        self.index.get(postcode).map(|&i| &self.records[i])
    }

    /// Check whether a postcode has a record.
    pub fn contains(&self, postcode: &str) -> bool {
        self.index.contains_key(postcode)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no postcode resolved.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, GeometryRecord> {
        self.records.iter()
    }

    /// Postcodes in insertion order.
    pub fn postcodes(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.postcode.as_str())
    }
}

impl PartialEq for GeometryTable {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl FromIterator<GeometryRecord> for GeometryTable {
    fn from_iter<I: IntoIterator<Item = GeometryRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

impl<'a> IntoIterator for &'a GeometryTable {
    type Item = &'a GeometryRecord;
    type IntoIter = std::slice::Iter<'a, GeometryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Build a closed unit-square multipolygon with its lower-left corner at `(x, y)`.
///
/// Used by tests across the crate.
#[cfg(test)]
pub(crate) fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    use geo_types::{LineString, Polygon};

    let ring = LineString::from(vec![
        (x, y),
        (x, y + 1.0),
        (x + 1.0, y + 1.0),
        (x + 1.0, y),
        (x, y),
    ]);
    MultiPolygon(vec![Polygon::new(ring, vec![])])
}
