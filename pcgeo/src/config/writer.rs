//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let metrics_file = config
        .data
        .metrics_file
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let shapefile_dir = config
        .shapefiles
        .directory
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[data]
; Default metrics file (CSV or JSON) with a column whose name contains "postcode"
; Example: metrics_file = ~/data/epc_certificates.csv
metrics_file = {}

[shapefiles]
; Root of the postcode polygon collection. Must contain
;   one_letter_pc_code/<letter>/<letter>.shp
;   two_letter_pc_code/<letters>.shp
directory = {}

[store]
; Directory holding <region>_postcodes.geojson files (default: ./geo_files)
; Delete a file, or run `pcgeo invalidate --region NAME`, to force a rebuild
directory = {}

[region]
; Region used when --region is not given (default: EE)
default = {}

[metrics]
; Comma separated metric columns shown by `pcgeo join` when --metric is not given
; Example: columns = PPI, CURRENT_ENERGY_EFFICIENCY
columns = {}

[logging]
; Log file path (default: ~/.pcgeo/logs/pcgeo.log)
file = {}
"#,
        metrics_file,
        shapefile_dir,
        path_to_string(&config.store.directory),
        config.region.default,
        config.metrics.columns.join(", "),
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing the home directory to ~.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.data.metrics_file = Some(PathBuf::from("/data/epc.csv"));
        config.shapefiles.directory = Some(PathBuf::from("/data/shapes"));
        config.region.default = "LN".to_string();
        config.metrics.columns = vec!["PPI".to_string(), "EER".to_string()];

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, ConfigFile::default());
    }

    #[test]
    fn test_written_file_is_commented() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("[shapefiles]"));
        assert!(text.contains("; Region used when --region is not given"));
        assert!(text.contains("default = EE"));
    }

    #[test]
    fn test_path_to_string_collapses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path_to_string(&home.join("x/y")), "~/x/y");
        }
        assert_eq!(path_to_string(Path::new("/abs")), "/abs");
    }
}
