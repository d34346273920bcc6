//! Default values and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;

pub use crate::pipeline::{DEFAULT_REGION, DEFAULT_STORE_DIR};

/// Log file name inside the log directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "pcgeo.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let log_dir = super::file::config_directory().join("logs");

        Self {
            data: DataSettings::default(),
            shapefiles: ShapefileSettings::default(),
            store: StoreSettings {
                directory: PathBuf::from(DEFAULT_STORE_DIR),
            },
            region: RegionSettings {
                default: DEFAULT_REGION.to_string(),
            },
            metrics: MetricsSettings::default(),
            logging: LoggingSettings {
                file: log_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
