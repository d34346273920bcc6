//! User configuration stored in `~/.pcgeo/config.ini`.
//!
//! ```text
//! [data]        metrics_file
//! [shapefiles]  directory
//! [store]       directory
//! [region]      default
//! [metrics]     columns
//! [logging]     file
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pcgeo::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::load()?;
//! ConfigKey::RegionDefault.set(&mut config, "LN")?;
//! config.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_LOG_FILE_NAME, DEFAULT_REGION, DEFAULT_STORE_DIR};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use parser::expand_tilde;
pub use settings::{
    ConfigFile, DataSettings, LoggingSettings, MetricsSettings, RegionSettings, ShapefileSettings,
    StoreSettings,
};
