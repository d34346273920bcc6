//! Region store: build once, then reuse the persisted set.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::catalog::{self, is_valid_region_name, region_file_name};
use super::persist::{decode_geometry, encode_geometry};
use super::StoreError;
use crate::geometry::GeometryTable;
use crate::resolve::{GeometryResolver, ResolutionSummary, UnresolvedPostcode};
use crate::shard::ShardSource;

/// A region's resolved geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGeoSet {
    /// Region name.
    pub region: String,
    /// One row per resolved postcode.
    pub table: GeometryTable,
}

/// Options for [`RegionStore::get_or_build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Ignore any persisted set and resolve again.
    pub force_rebuild: bool,
    /// Write a freshly built set to the store.
    pub persist: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            force_rebuild: false,
            persist: true,
        }
    }
}

/// Where a [`RegionBuild`] came from.
#[derive(Debug, Clone)]
pub enum BuildOrigin {
    /// Loaded from a persisted file.
    Loaded { path: PathBuf },
    /// Resolved from shards during this call.
    Resolved {
        summary: ResolutionSummary,
        unresolved: Vec<UnresolvedPostcode>,
        /// Where the set was written, if saving succeeded.
        persisted: Option<PathBuf>,
    },
}

/// Result of [`RegionStore::get_or_build`].
#[derive(Debug, Clone)]
pub struct RegionBuild {
    pub set: RegionGeoSet,
    pub origin: BuildOrigin,
}

impl RegionBuild {
    /// True if the set was read from disk.
    pub fn was_loaded(&self) -> bool {
        matches!(self.origin, BuildOrigin::Loaded { .. })
    }
}

/// Directory of persisted region sets.
///
/// # Example
///
/// ```no_run
/// use pcgeo::resolve::GeometryResolver;
/// use pcgeo::shard::ShapefileShards;
/// use pcgeo::store::{BuildOptions, RegionStore};
///
/// let store = RegionStore::new("./geo_files");
/// let resolver = GeometryResolver::new(ShapefileShards::new("/data/codepoint-poly"));
/// let build = store.get_or_build("EE", ["CB3 0DG", "CB2 1TN"], &resolver, BuildOptions::default())?;
/// println!("{} polygons for {}", build.set.table.len(), build.set.region);
/// # Ok::<(), pcgeo::store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RegionStore {
    directory: PathBuf,
}

impl RegionStore {
    /// Create a store rooted at `directory`. Nothing is created until a save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Store directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of a region's persisted set.
    pub fn region_path(&self, region: &str) -> PathBuf {
        self.directory.join(region_file_name(region))
    }

    /// Whether a region has a persisted set.
    pub fn exists(&self, region: &str) -> bool {
        validate_region(region).is_ok() && self.region_path(region).is_file()
    }

    /// Regions with a persisted set, sorted.
    pub fn list_regions(&self) -> Result<Vec<String>, StoreError> {
        catalog::list_regions(&self.directory).map_err(|source| StoreError::Io {
            path: self.directory.clone(),
            source,
        })
    }

    /// Load a region's persisted set.
    pub fn load(&self, region: &str) -> Result<RegionGeoSet, StoreError> {
        validate_region(region)?;
        let path = self.region_path(region);
        if !path.is_file() {
            return Err(StoreError::NotFound {
                region: region.to_string(),
                path,
            });
        }

        let bytes = std::fs::read(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|e| StoreError::Decode {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let table = decode_geometry(&text).map_err(|reason| StoreError::Decode {
            path: path.clone(),
            reason,
        })?;

        debug!(region = %region, path = %path.display(), polygons = table.len(), "Loaded region set");
        Ok(RegionGeoSet {
            region: region.to_string(),
            table,
        })
    }

    /// Persist a set, replacing any existing file. Returns the written path.
    pub fn save(&self, set: &RegionGeoSet) -> Result<PathBuf, StoreError> {
        validate_region(&set.region)?;
        std::fs::create_dir_all(&self.directory).map_err(|source| StoreError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let path = self.region_path(&set.region);
        let temp_path = path.with_extension("tmp");
        let text = encode_geometry(&set.region, &set.table);
        std::fs::write(&temp_path, text).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        std::fs::rename(&temp_path, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        info!(region = %set.region, path = %path.display(), polygons = set.table.len(), "Saved region set");
        Ok(path)
    }

    /// Delete a region's persisted set. Returns false if there was none.
    pub fn invalidate(&self, region: &str) -> Result<bool, StoreError> {
        validate_region(region)?;
        let path = self.region_path(region);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!(region = %region, path = %path.display(), "Invalidated region set");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Return the region's set, resolving and persisting it if absent.
    ///
    /// An existing file is returned as-is regardless of `postcodes`. A file
    /// that fails to decode is logged and rebuilt. Resolution that yields no
    /// geometry is an error and nothing is written. A failed save is logged
    /// and the built set is still returned.
    pub fn get_or_build<S, I>(
        &self,
        region: &str,
        postcodes: I,
        resolver: &GeometryResolver<S>,
        options: BuildOptions,
    ) -> Result<RegionBuild, StoreError>
    where
        S: ShardSource,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        validate_region(region)?;

        if !options.force_rebuild && self.region_path(region).is_file() {
            match self.load(region) {
                Ok(set) => {
                    info!(region = %region, polygons = set.table.len(), "Using existing region set");
                    return Ok(RegionBuild {
                        origin: BuildOrigin::Loaded {
                            path: self.region_path(region),
                        },
                        set,
                    });
                }
                Err(StoreError::Decode { path, reason }) => {
                    warn!(
                        region = %region,
                        path = %path.display(),
                        reason = %reason,
                        "Region set unreadable, rebuilding"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        info!(region = %region, "Building region set");
        let resolution = resolver.resolve(postcodes);
        let summary = resolution.summary();
        if resolution.is_empty() {
            warn!(region = %region, summary = %summary, "No geometry resolved");
            return Err(StoreError::NoGeometryResolved {
                region: region.to_string(),
                summary,
            });
        }

        let set = RegionGeoSet {
            region: region.to_string(),
            table: resolution.table,
        };

        let persisted = if options.persist {
            match self.save(&set) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(region = %region, error = %e, "Failed to save region set");
                    None
                }
            }
        } else {
            None
        };

        Ok(RegionBuild {
            set,
            origin: BuildOrigin::Resolved {
                summary,
                unresolved: resolution.unresolved,
                persisted,
            },
        })
    }
}

fn validate_region(region: &str) -> Result<(), StoreError> {
    if is_valid_region_name(region) {
        Ok(())
    } else {
        Err(StoreError::InvalidRegionName(region.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::MemoryShards;
    use tempfile::TempDir;

    fn resolver() -> GeometryResolver<MemoryShards> {
        GeometryResolver::new(MemoryShards::new(&[
            ("cb", vec!["CB30DG", "CB21TN"]),
            ("b", vec!["B1 1AA"]),
        ]))
    }

    #[test]
    fn test_builds_and_persists_then_reuses() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path().join("geo_files"));
        let resolver = resolver();

        let first = store
            .get_or_build("EE", ["CB30DG", "B1 1AA", "XX99ZZ"], &resolver, BuildOptions::default())
            .unwrap();
        assert!(!first.was_loaded());
        assert_eq!(first.set.table.len(), 2);
        match &first.origin {
            BuildOrigin::Resolved {
                summary, persisted, ..
            } => {
                assert_eq!(summary.resolved, 2);
                assert_eq!(persisted.as_deref(), Some(store.region_path("EE").as_path()));
            }
            other => panic!("unexpected origin {:?}", other),
        }
        let loads_after_build = resolver.source().loads.get();

        let second = store
            .get_or_build("EE", ["CB21TN"], &resolver, BuildOptions::default())
            .unwrap();
        assert!(second.was_loaded());
        assert_eq!(second.set, first.set);
        assert_eq!(resolver.source().loads.get(), loads_after_build);
    }

    #[test]
    fn test_force_rebuild_resolves_again() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());
        let resolver = resolver();

        store
            .get_or_build("EE", ["CB30DG"], &resolver, BuildOptions::default())
            .unwrap();
        let rebuilt = store
            .get_or_build(
                "EE",
                ["CB30DG", "CB21TN"],
                &resolver,
                BuildOptions {
                    force_rebuild: true,
                    ..BuildOptions::default()
                },
            )
            .unwrap();

        assert!(!rebuilt.was_loaded());
        assert_eq!(store.load("EE").unwrap().table.len(), 2);
    }

    #[test]
    fn test_nothing_resolved_is_error_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());

        let err = store
            .get_or_build("EE", ["XX99ZZ", "bad"], &resolver(), BuildOptions::default())
            .unwrap_err();

        match err {
            StoreError::NoGeometryResolved { region, summary } => {
                assert_eq!(region, "EE");
                assert_eq!(summary.requested, 2);
                assert_eq!(summary.invalid_format.count, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(!store.exists("EE"));
    }

    #[test]
    fn test_corrupt_file_is_rebuilt() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());
        std::fs::write(store.region_path("EE"), "{ not geojson").unwrap();

        let build = store
            .get_or_build("EE", ["CB30DG"], &resolver(), BuildOptions::default())
            .unwrap();

        assert!(!build.was_loaded());
        assert_eq!(store.load("EE").unwrap().table.len(), 1);
    }

    #[test]
    fn test_non_utf8_file_is_rebuilt() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());
        std::fs::write(store.region_path("EE"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        assert!(matches!(store.load("EE"), Err(StoreError::Decode { .. })));

        let build = store
            .get_or_build("EE", ["CB30DG"], &resolver(), BuildOptions::default())
            .unwrap();

        assert!(!build.was_loaded());
        assert_eq!(store.load("EE").unwrap().table.len(), 1);
    }

    #[test]
    fn test_persist_false_skips_save() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());

        let build = store
            .get_or_build(
                "EE",
                ["CB30DG"],
                &resolver(),
                BuildOptions {
                    persist: false,
                    ..BuildOptions::default()
                },
            )
            .unwrap();

        assert_eq!(build.set.table.len(), 1);
        assert!(!store.exists("EE"));
    }

    #[test]
    fn test_save_failure_still_returns_set() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();
        let store = RegionStore::new(&blocker);

        let build = store
            .get_or_build("EE", ["CB30DG"], &resolver(), BuildOptions::default())
            .unwrap();

        match build.origin {
            BuildOrigin::Resolved { persisted, .. } => assert!(persisted.is_none()),
            other => panic!("unexpected origin {:?}", other),
        }
    }

    #[test]
    fn test_invalidate() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());
        store
            .get_or_build("EE", ["CB30DG"], &resolver(), BuildOptions::default())
            .unwrap();

        assert!(store.invalidate("EE").unwrap());
        assert!(!store.exists("EE"));
        assert!(!store.invalidate("EE").unwrap());
    }

    #[test]
    fn test_load_missing_region() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());
        assert!(matches!(store.load("LN"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_rejects_path_like_region_names() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());
        for name in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                store.load(name),
                Err(StoreError::InvalidRegionName(_))
            ));
        }
        assert!(!store.exists("../EE"));
    }

    #[test]
    fn test_list_regions_after_builds() {
        let dir = TempDir::new().unwrap();
        let store = RegionStore::new(dir.path());
        let resolver = resolver();
        for region in ["LN", "EE"] {
            store
                .get_or_build(region, ["CB30DG"], &resolver, BuildOptions::default())
                .unwrap();
        }
        assert_eq!(store.list_regions().unwrap(), vec!["EE", "LN"]);
    }
}
