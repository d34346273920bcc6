//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use pcgeo::config::ConfigFileError;
use pcgeo::join::JoinError;
use pcgeo::pipeline::{PipelineError, RegionFailure};
use pcgeo::store::StoreError;
use pcgeo::table::TableError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// A required path was neither given nor configured
    MissingSetting {
        what: &'static str,
        flag: &'static str,
        key: &'static str,
    },
    /// Pipeline stopped on malformed input
    Pipeline(PipelineError),
    /// Region store operation failed
    Store(StoreError),
    /// The region produced no joined data
    Region { region: String, failure: RegionFailure },
    /// Failed to serialize output
    Encode(String),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::MissingSetting { flag, key, .. } => {
                eprintln!();
                eprintln!("Pass {} or set it once with:", flag);
                eprintln!("  pcgeo config set {} <PATH>", key);
            }
            CliError::Pipeline(PipelineError::Join(JoinError::NoPostcodeColumn { .. })) => {
                eprintln!();
                eprintln!("The metrics file needs a column whose name contains \"postcode\".");
            }
            CliError::Pipeline(PipelineError::Table(TableError::UnsupportedFormat(_))) => {
                eprintln!();
                eprintln!("Export the spreadsheet as CSV and try again.");
            }
            CliError::Region {
                failure: RegionFailure::NoGeometryResolved { .. },
                ..
            } => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Shapefile directory does not contain one_letter_pc_code/ and two_letter_pc_code/");
                eprintln!("  2. Postcodes are lowercase or use O/0 substitutions");
                eprintln!("  3. Re-run with --debug to see every unresolved postcode");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::MissingSetting { what, .. } => write!(f, "No {} configured", what),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Store(e) => write!(f, "{}", e),
            CliError::Region { region, failure } => {
                write!(f, "Region '{}' has no map data: {}", region, failure)
            }
            CliError::Encode(msg) => write!(f, "Failed to encode output: {}", msg),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Pipeline(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}
