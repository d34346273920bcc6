//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, config lookups, and file operations
//! to reduce duplication across command handlers.

use std::path::{Path, PathBuf};

use pcgeo::config::ConfigFile;
use pcgeo::logging::{default_log_file, init_logging, LoggingGuard};
use pcgeo::store::RegionStore;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// Log lines are echoed to stdout only in debug mode on a terminal, so
    /// redirected command output stays clean.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let stdout_enabled = debug_mode && atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging(&log_dir, &log_file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("pcgeo v{}", pcgeo::VERSION);
        info!("pcgeo CLI: {} command", command);
    }

    /// Region from the command line, else the configured default.
    pub fn region(&self, cli_region: Option<String>) -> String {
        cli_region.unwrap_or_else(|| self.config.region.default.clone())
    }

    /// Metrics file from the command line, else config.
    pub fn metrics_file(&self, cli_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
        cli_path
            .or_else(|| self.config.data.metrics_file.clone())
            .ok_or(CliError::MissingSetting {
                what: "metrics file",
                flag: "--metrics",
                key: "data.metrics_file",
            })
    }

    /// Shapefile root from the command line, else config.
    pub fn shapefile_dir(&self, cli_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
        cli_path
            .or_else(|| self.config.shapefiles.directory.clone())
            .ok_or(CliError::MissingSetting {
                what: "shapefile directory",
                flag: "--shapefiles",
                key: "shapefiles.directory",
            })
    }

    /// Region store from the command line directory, else config.
    pub fn store(&self, cli_path: Option<PathBuf>) -> RegionStore {
        RegionStore::new(cli_path.unwrap_or_else(|| self.config.store.directory.clone()))
    }

    /// Metric columns from the command line, else config.
    pub fn metric_columns(&self, cli_columns: Vec<String>) -> Vec<String> {
        if cli_columns.is_empty() {
            self.config.metrics.columns.clone()
        } else {
            cli_columns
        }
    }

    /// Write output file, mapping errors to CliError.
    pub fn write_output(&self, path: &Path, data: &str) -> Result<(), CliError> {
        std::fs::write(path, data).map_err(|e| CliError::FileWrite {
            path: path.display().to_string(),
            error: e,
        })?;
        info!(path = %path.display(), bytes = data.len(), "Wrote output file");
        Ok(())
    }
}
