//! Tabular metrics input.
//!
//! A [`MetricsTable`] is an arbitrary-schema table supplied by the caller,
//! keyed by a postcode-bearing column. Cells are loosely typed
//! ([`CellValue`]) the way spreadsheet exports usually are.

mod cell;
mod load;
mod metrics;

pub use cell::CellValue;
pub use load::{load_metrics, read_csv, read_json, TableFormat};
pub use metrics::MetricsTable;

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or addressing a metrics table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Failed to open the file.
    #[error("Failed to read metrics file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed but is not a list of records.
    #[error("Unexpected JSON layout: {0}")]
    JsonShape(String),

    /// File extension we cannot read.
    #[error("Unsupported metrics file format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),

    /// Named column is absent.
    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    /// Row length does not match the header.
    #[error("Row has {found} cells but the table has {expected} columns")]
    RowWidth { expected: usize, found: usize },
}
