//! Shard sources: where polygon shards come from.

use std::path::{Path, PathBuf};

use geo_types::{Geometry, MultiPolygon};
use shapefile::dbase::FieldValue;
use shapefile::Shape;
use thiserror::Error;
use tracing::debug;

use super::table::PolygonTable;
use crate::geometry::POSTCODE_FIELD;
use crate::postcode::ShardKey;

/// Shard loading errors.
///
/// All variants are terminal for their shard within one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShardError {
    /// The shard file does not exist.
    #[error("Shard '{key}' not found at {}", path.display())]
    NotFound { key: ShardKey, path: PathBuf },

    /// The shard file exists but could not be read.
    #[error("Shard '{key}' at {} is unreadable: {reason}", path.display())]
    Unreadable {
        key: ShardKey,
        path: PathBuf,
        reason: String,
    },

    /// The shard's attribute table has no POSTCODE column.
    #[error("Shard '{key}' at {} has no POSTCODE attribute", path.display())]
    MissingPostcodeField { key: ShardKey, path: PathBuf },
}

impl ShardError {
    /// The shard the error refers to.
    pub fn key(&self) -> &ShardKey {
        match self {
            ShardError::NotFound { key, .. }
            | ShardError::Unreadable { key, .. }
            | ShardError::MissingPostcodeField { key, .. } => key,
        }
    }
}

/// Provider of polygon shards.
///
/// Implementations are not expected to cache; wrap them in a
/// [`ShardCache`](super::ShardCache) for that.
pub trait ShardSource {
    /// Load the full polygon table for a shard.
    fn load(&self, key: &ShardKey) -> Result<PolygonTable, ShardError>;
}

impl<S: ShardSource + ?Sized> ShardSource for &S {
    fn load(&self, key: &ShardKey) -> Result<PolygonTable, ShardError> {
        (**self).load(key)
    }
}

/// Shard source backed by the prefix-sharded shapefile collection.
///
/// Each shapefile must carry a `POSTCODE` character attribute. Rows with
/// non-polygon geometry or an empty postcode are skipped.
#[derive(Debug, Clone)]
pub struct ShapefileShards {
    root: PathBuf,
}

impl ShapefileShards {
    /// Create a source rooted at the shapefile collection directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the collection.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ShardSource for ShapefileShards {
    fn load(&self, key: &ShardKey) -> Result<PolygonTable, ShardError> {
        let path = key.path_in(&self.root);
        if !path.is_file() {
            return Err(ShardError::NotFound {
                key: key.clone(),
                path,
            });
        }

        let unreadable = |reason: String| ShardError::Unreadable {
            key: key.clone(),
            path: path.clone(),
            reason,
        };

        let mut reader =
            shapefile::Reader::from_path(&path).map_err(|e| unreadable(e.to_string()))?;
        let mut table = PolygonTable::new(key.clone());

        for entry in reader.iter_shapes_and_records() {
            let (shape, record) = entry.map_err(|e| unreadable(e.to_string()))?;

            let postcode = match record.get(POSTCODE_FIELD) {
                Some(FieldValue::Character(Some(value))) if !value.trim().is_empty() => {
                    value.trim().to_string()
                }
                Some(_) => {
                    table.record_skipped();
                    continue;
                }
                None => {
                    return Err(ShardError::MissingPostcodeField {
                        key: key.clone(),
                        path: path.clone(),
                    })
                }
            };

            match shape_to_multipolygon(shape) {
                Some(polygon) => {
                    table.insert(postcode, polygon);
                }
                None => table.record_skipped(),
            }
        }

        debug!(
            shard = %key,
            path = %path.display(),
            postcodes = table.len(),
            duplicates = table.duplicates(),
            skipped = table.skipped(),
            "Loaded shard"
        );

        Ok(table)
    }
}

/// Convert a shapefile shape to a multipolygon, discarding non-areal shapes.
fn shape_to_multipolygon(shape: Shape) -> Option<MultiPolygon<f64>> {
    match Geometry::<f64>::try_from(shape).ok()? {
        Geometry::MultiPolygon(polygon) => Some(polygon),
        Geometry::Polygon(polygon) => Some(MultiPolygon(vec![polygon])),
        _ => None,
    }
}
