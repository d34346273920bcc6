//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub data: DataSettings,
    pub shapefiles: ShapefileSettings,
    pub store: StoreSettings,
    pub region: RegionSettings,
    pub metrics: MetricsSettings,
    pub logging: LoggingSettings,
}

/// Tabular input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSettings {
    /// Metrics file used when none is given on the command line
    pub metrics_file: Option<PathBuf>,
}

/// Shard collection location.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapefileSettings {
    /// Root holding `one_letter_pc_code/` and `two_letter_pc_code/`
    pub directory: Option<PathBuf>,
}

/// Region set storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    /// Directory of `<region>_postcodes.geojson` files
    pub directory: PathBuf,
}

/// Region selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSettings {
    /// Region used when none is given
    pub default: String,
}

/// Metric column selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsSettings {
    /// Columns shown by `join` when none are given
    pub columns: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
