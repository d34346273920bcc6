//! Left join of metrics rows onto postcode geometry.
//!
//! [`join`] keeps every metrics row, attaching a polygon where the row's
//! postcode has one, and reports how many rows matched ([`MatchStats`]).
//! [`detect_postcode_column`] finds the join column by name.

mod columns;
mod engine;
mod export;
mod joined;

pub use columns::{detect_postcode_column, find_postcode_columns, ColumnSelection};
pub use engine::{join, JoinOutcome, MatchStats, MatchStatus};
pub use joined::{JoinedRow, JoinedTable, MetricSummary};

use thiserror::Error;

/// Join errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// No column name contains "postcode".
    #[error("No postcode column found (columns: {}); a column name must contain 'postcode'", columns.join(", "))]
    NoPostcodeColumn { columns: Vec<String> },

    /// Several columns qualify and the caller asked for a single one.
    #[error("Ambiguous postcode column: {}", candidates.join(", "))]
    AmbiguousPostcodeColumn { candidates: Vec<String> },

    /// Named column is absent from the table.
    #[error("Column '{0}' not found")]
    UnknownColumn(String),
}
