//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::store::is_valid_region_name;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [data] section
    if let Some(section) = ini.section(Some("data")) {
        if let Some(v) = section.get("metrics_file") {
            config.data.metrics_file = optional_path(v);
        }
    }

    // [shapefiles] section
    if let Some(section) = ini.section(Some("shapefiles")) {
        if let Some(v) = section.get("directory") {
            config.shapefiles.directory = optional_path(v);
        }
    }

    // [store] section
    if let Some(section) = ini.section(Some("store")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.store.directory = expand_tilde(v);
            }
        }
    }

    // [region] section
    if let Some(section) = ini.section(Some("region")) {
        if let Some(v) = section.get("default") {
            let v = v.trim();
            if !is_valid_region_name(v) {
                return Err(ConfigFileError::InvalidValue {
                    section: "region".to_string(),
                    key: "default".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-empty name without path separators".to_string(),
                });
            }
            config.region.default = v.to_string();
        }
    }

    // [metrics] section
    if let Some(section) = ini.section(Some("metrics")) {
        if let Some(v) = section.get("columns") {
            config.metrics.columns = parse_column_list(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Split a comma separated column list, dropping empty entries.
pub(super) fn parse_column_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Empty → None, otherwise a tilde-expanded path.
pub(super) fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(expand_tilde(value))
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load(text: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, text).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[data]
metrics_file = /data/epc.csv

[shapefiles]
directory = /data/codepoint-poly

[store]
directory = /var/lib/pcgeo

[region]
default = LN

[metrics]
columns = PPI, EER ,, CO2

[logging]
file = /tmp/pcgeo.log
"#,
        )
        .unwrap();

        assert_eq!(
            config.data.metrics_file,
            Some(PathBuf::from("/data/epc.csv"))
        );
        assert_eq!(
            config.shapefiles.directory,
            Some(PathBuf::from("/data/codepoint-poly"))
        );
        assert_eq!(config.store.directory, PathBuf::from("/var/lib/pcgeo"));
        assert_eq!(config.region.default, "LN");
        assert_eq!(config.metrics.columns, vec!["PPI", "EER", "CO2"]);
        assert_eq!(config.logging.file, PathBuf::from("/tmp/pcgeo.log"));
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[region]
default = LN
"#,
        )
        .unwrap();

        let default = ConfigFile::default();
        assert_eq!(config.region.default, "LN");
        assert_eq!(config.store.directory, default.store.directory);
        assert_eq!(config.logging.file, default.logging.file);
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config = load(
            r#"
[data]
metrics_file =
[store]
directory =
"#,
        )
        .unwrap();

        assert!(config.data.metrics_file.is_none());
        assert_eq!(config.store.directory, ConfigFile::default().store.directory);
    }

    #[test]
    fn test_invalid_region() {
        let err = load(
            r#"
[region]
default = ../etc
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("region.default"));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
        assert_eq!(expand_tilde("./geo_files"), PathBuf::from("./geo_files"));
    }
}
