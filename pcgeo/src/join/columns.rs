//! Postcode column detection.

use super::JoinError;

/// How to choose among several postcode-like columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Use the first candidate in column order.
    #[default]
    First,
    /// Fail unless exactly one candidate exists.
    Unambiguous,
}

/// Columns whose name contains "postcode", case-insensitively, in order.
pub fn find_postcode_columns(columns: &[String]) -> Vec<&str> {
    columns
        .iter()
        .filter(|c| c.to_lowercase().contains("postcode"))
        .map(String::as_str)
        .collect()
}

/// Pick the postcode column.
///
/// # Examples
///
/// ```
/// use pcgeo::join::{detect_postcode_column, ColumnSelection};
///
/// let columns = vec!["id".to_string(), "Postcode".to_string(), "postcode_2011".to_string()];
/// assert_eq!(detect_postcode_column(&columns, ColumnSelection::First).unwrap(), "Postcode");
/// assert!(detect_postcode_column(&columns, ColumnSelection::Unambiguous).is_err());
/// ```
pub fn detect_postcode_column(
    columns: &[String],
    selection: ColumnSelection,
) -> Result<&str, JoinError> {
    let candidates = find_postcode_columns(columns);
    match (candidates.as_slice(), selection) {
        ([], _) => Err(JoinError::NoPostcodeColumn {
            columns: columns.to_vec(),
        }),
        ([only], _) => Ok(*only),
        ([first, ..], ColumnSelection::First) => Ok(*first),
        (_, ColumnSelection::Unambiguous) => Err(JoinError::AmbiguousPostcodeColumn {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        }),
    }
}
