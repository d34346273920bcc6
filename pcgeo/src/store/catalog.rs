//! Region catalog: which regions already have a persisted set.

use std::io;
use std::path::Path;

/// File-name suffix of persisted region sets.
pub const REGION_FILE_SUFFIX: &str = "_postcodes.geojson";

/// File name for a region's persisted set.
pub fn region_file_name(region: &str) -> String {
    format!("{}{}", region, REGION_FILE_SUFFIX)
}

/// Whether `region` can be used as a file-name prefix.
///
/// Rejects empty names, `.`/`..`, path separators and control characters.
pub fn is_valid_region_name(region: &str) -> bool {
    !region.is_empty()
        && region != "."
        && region != ".."
        && !region.contains(['/', '\\'])
        && !region.chars().any(char::is_control)
}

/// List region names with a persisted set in `directory`, sorted.
///
/// A missing directory yields an empty list. Only files (or symlinks to
/// files) named `<region>_postcodes.geojson` with a non-empty region are
/// counted.
pub fn list_regions(directory: &Path) -> io::Result<Vec<String>> {
    if !directory.exists() {
        return Ok(Vec::new());
    }

    let mut regions = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(region) = name.strip_suffix(REGION_FILE_SUFFIX) {
            if !region.is_empty() {
                regions.push(region.to_string());
            }
        }
    }

    regions.sort();
    Ok(regions)
}
