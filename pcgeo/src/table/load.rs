//! Reading metrics tables from CSV and JSON files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

use super::cell::CellValue;
use super::metrics::MetricsTable;
use super::TableError;

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    /// Pick a format from the file extension.
    ///
    /// Spreadsheets are rejected; anything unrecognised is read as CSV.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(TableFormat::Json),
            "xlsx" | "xls" => Err(TableError::UnsupportedFormat(ext)),
            _ => Ok(TableFormat::Csv),
        }
    }
}

/// Load a metrics table, choosing the reader from the file extension.
pub fn load_metrics(path: &Path) -> Result<MetricsTable, TableError> {
    let format = TableFormat::from_path(path)?;
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let table = match format {
        TableFormat::Csv => read_csv(reader)?,
        TableFormat::Json => read_json(reader)?,
    };

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "Loaded metrics table"
    );
    Ok(table)
}

/// Read a CSV table with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<MetricsTable, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut table = MetricsTable::new(headers.iter());

    for record in csv_reader.records() {
        let record = record?;
        table.push_row(record.iter().map(CellValue::parse).collect())?;
    }

    Ok(table)
}

/// Read a JSON table.
///
/// Accepts an array of objects (one per row) or a single object (one row).
/// Columns appear in first-seen key order; keys missing from a row are null.
pub fn read_json<R: Read>(reader: R) -> Result<MetricsTable, TableError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;

    let records = match value {
        serde_json::Value::Array(items) => items,
        obj @ serde_json::Value::Object(_) => vec![obj],
        other => {
            return Err(TableError::JsonShape(format!(
                "expected an array of objects, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut objects = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        match record {
            serde_json::Value::Object(map) => objects.push(map),
            other => {
                return Err(TableError::JsonShape(format!(
                    "row {} is {}, expected an object",
                    i,
                    json_kind(&other)
                )))
            }
        }
    }

    let mut columns: Vec<String> = Vec::new();
    for map in &objects {
        for key in map.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = MetricsTable::new(columns.iter().cloned());
    for map in &objects {
        let row = columns
            .iter()
            .map(|c| map.get(c).map_or(CellValue::Null, CellValue::from_json))
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
