//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with a validator per key.

use std::str::FromStr;
use thiserror::Error;

use super::settings::ConfigFile;
use super::parser::{expand_tilde, optional_path, parse_column_list};
use super::writer::path_to_string;
use crate::store::is_valid_region_name;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DataMetricsFile,
    ShapefilesDirectory,
    StoreDirectory,
    RegionDefault,
    MetricsColumns,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "store.directory").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::DataMetricsFile => "data.metrics_file",
            ConfigKey::ShapefilesDirectory => "shapefiles.directory",
            ConfigKey::StoreDirectory => "store.directory",
            ConfigKey::RegionDefault => "region.default",
            ConfigKey::MetricsColumns => "metrics.columns",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "store").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "directory").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::DataMetricsFile => config
                .data
                .metrics_file
                .as_ref()
                .map(|p| path_to_string(p))
                .unwrap_or_default(),
            ConfigKey::ShapefilesDirectory => config
                .shapefiles
                .directory
                .as_ref()
                .map(|p| path_to_string(p))
                .unwrap_or_default(),
            ConfigKey::StoreDirectory => path_to_string(&config.store.directory),
            ConfigKey::RegionDefault => config.region.default.clone(),
            ConfigKey::MetricsColumns => config.metrics.columns.join(", "),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        self.set_unchecked(config, value.trim());
        Ok(())
    }

    /// Set the value without validation. Use `set()` for validated setting.
    fn set_unchecked(&self, config: &mut ConfigFile, value: &str) {
        match self {
            ConfigKey::DataMetricsFile => config.data.metrics_file = optional_path(value),
            ConfigKey::ShapefilesDirectory => config.shapefiles.directory = optional_path(value),
            ConfigKey::StoreDirectory => config.store.directory = expand_tilde(value),
            ConfigKey::RegionDefault => config.region.default = value.to_string(),
            ConfigKey::MetricsColumns => config.metrics.columns = parse_column_list(value),
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::DataMetricsFile => Box::new(OptionalPathSpec),
            ConfigKey::ShapefilesDirectory => Box::new(OptionalPathSpec),
            ConfigKey::StoreDirectory => Box::new(PathSpec),
            ConfigKey::RegionDefault => Box::new(RegionNameSpec),
            ConfigKey::MetricsColumns => Box::new(AnyStringSpec),
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::DataMetricsFile,
            ConfigKey::ShapefilesDirectory,
            ConfigKey::StoreDirectory,
            ConfigKey::RegionDefault,
            ConfigKey::MetricsColumns,
            ConfigKey::LoggingFile,
        ]
    }
}

// ============================================================================
// Value Specifications (Specification Pattern)
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Check if the value satisfies this specification.
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Specification that accepts any string value.
struct AnyStringSpec;

impl ValueSpecification for AnyStringSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Specification for path values (non-empty).
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}

/// Specification for optional path values (empty allowed).
struct OptionalPathSpec;

impl ValueSpecification for OptionalPathSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Specification for region names, which become file names.
struct RegionNameSpec;

impl ValueSpecification for RegionNameSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if is_valid_region_name(value) {
            Ok(())
        } else {
            Err("must be a non-empty name without path separators".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_key_parsing() {
        assert_eq!(
            "store.directory".parse::<ConfigKey>().unwrap(),
            ConfigKey::StoreDirectory
        );
        assert_eq!(
            "region.default".parse::<ConfigKey>().unwrap(),
            ConfigKey::RegionDefault
        );
        // Case insensitive
        assert_eq!(
            "METRICS.COLUMNS".parse::<ConfigKey>().unwrap(),
            ConfigKey::MetricsColumns
        );
        assert!("invalid.key".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_key_name_parts() {
        assert_eq!(ConfigKey::DataMetricsFile.section(), "data");
        assert_eq!(ConfigKey::DataMetricsFile.key_name(), "metrics_file");
        assert_eq!(ConfigKey::RegionDefault.section(), "region");
        assert_eq!(ConfigKey::RegionDefault.key_name(), "default");
    }

    #[test]
    fn test_get_value() {
        let config = ConfigFile::default();

        assert_eq!(ConfigKey::RegionDefault.get(&config), "EE");
        assert_eq!(ConfigKey::StoreDirectory.get(&config), "./geo_files");
        assert_eq!(ConfigKey::ShapefilesDirectory.get(&config), "");
        assert_eq!(ConfigKey::MetricsColumns.get(&config), "");
    }

    #[test]
    fn test_set_value() {
        let mut config = ConfigFile::default();

        ConfigKey::RegionDefault.set(&mut config, "LN").unwrap();
        assert_eq!(config.region.default, "LN");

        ConfigKey::ShapefilesDirectory
            .set(&mut config, "/data/shapes")
            .unwrap();
        assert_eq!(
            config.shapefiles.directory,
            Some(PathBuf::from("/data/shapes"))
        );

        ConfigKey::MetricsColumns
            .set(&mut config, "PPI, EER")
            .unwrap();
        assert_eq!(config.metrics.columns, vec!["PPI", "EER"]);
        assert_eq!(ConfigKey::MetricsColumns.get(&config), "PPI, EER");
    }

    #[test]
    fn test_set_invalid_value_fails() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::RegionDefault.set(&mut config, "a/b").is_err());
        assert!(ConfigKey::StoreDirectory.set(&mut config, "  ").is_err());
        assert_eq!(config.region.default, "EE");
    }

    #[test]
    fn test_clear_optional_value() {
        let mut config = ConfigFile::default();
        config.data.metrics_file = Some(PathBuf::from("/data/epc.csv"));

        ConfigKey::DataMetricsFile.set(&mut config, "").unwrap();
        assert!(config.data.metrics_file.is_none());
    }

    #[test]
    fn test_all_keys() {
        let keys = ConfigKey::all();
        assert_eq!(keys.len(), 6);
        for key in keys {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
            assert!(!key.section().is_empty());
        }
    }
}
