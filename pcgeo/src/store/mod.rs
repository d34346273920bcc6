//! Persisted per-region geometry sets.
//!
//! Each region's resolved geometry is stored as one GeoJSON file named
//! `<region>_postcodes.geojson`. Once written, a file is trusted as-is:
//! [`RegionStore::get_or_build`] loads it without re-resolving, even if the
//! region's postcode list has changed since. Refreshing is explicit, either
//! with [`RegionStore::invalidate`] or [`BuildOptions::force_rebuild`].
//!
//! ```text
//! geo_files/
//! ├── EE_postcodes.geojson
//! └── LN_postcodes.geojson
//! ```

mod catalog;
mod persist;
mod region;

pub use catalog::{is_valid_region_name, list_regions, region_file_name, REGION_FILE_SUFFIX};
pub use persist::{decode_geometry, encode_geometry};
pub use region::{BuildOptions, BuildOrigin, RegionBuild, RegionGeoSet, RegionStore};

use std::path::PathBuf;

use thiserror::Error;

use crate::resolve::ResolutionSummary;

/// Regional store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Region names become file names and must be plain.
    #[error("Invalid region name '{0}'")]
    InvalidRegionName(String),

    /// No persisted set exists for the region.
    #[error("No geometry file for region '{region}' at {}", path.display())]
    NotFound { region: String, path: PathBuf },

    /// Filesystem failure.
    #[error("Region store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted file is not a valid geometry set.
    #[error("Invalid geometry file {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Resolution produced no geometry for the region.
    #[error("No geometry resolved for region '{region}': {summary}")]
    NoGeometryResolved {
        region: String,
        summary: ResolutionSummary,
    },
}
