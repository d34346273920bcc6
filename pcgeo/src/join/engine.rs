//! The join itself and its match diagnostics.

use std::fmt;

use tracing::{info, warn};

use super::joined::{JoinedRow, JoinedTable};
use super::JoinError;
use crate::geometry::GeometryTable;
use crate::table::MetricsTable;

/// Whether a join had any input rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// At least one metrics row was joined.
    Joined,
    /// The metrics table was empty; stats are all zero.
    NoData,
}

/// Match-rate diagnostics for a join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchStats {
    /// Rows that received a polygon.
    pub matched_count: usize,
    /// Rows in the metrics table.
    pub total_count: usize,
    /// `matched_count / total_count`, or 0.0 for an empty table.
    pub match_rate: f64,
    pub status: MatchStatus,
}

impl MatchStats {
    /// Compute stats from counts.
    pub fn new(matched_count: usize, total_count: usize) -> Self {
        if total_count == 0 {
            return Self {
                matched_count: 0,
                total_count: 0,
                match_rate: 0.0,
                status: MatchStatus::NoData,
            };
        }
        Self {
            matched_count,
            total_count,
            match_rate: matched_count as f64 / total_count as f64,
            status: MatchStatus::Joined,
        }
    }

    /// True when the metrics table had no rows.
    pub fn is_no_data(&self) -> bool {
        self.status == MatchStatus::NoData
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            MatchStatus::NoData => write!(f, "no data"),
            MatchStatus::Joined => write!(
                f,
                "{}/{} ({:.1}%)",
                self.matched_count,
                self.total_count,
                self.match_rate * 100.0
            ),
        }
    }
}

/// Result of a join.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub table: JoinedTable,
    pub stats: MatchStats,
}

/// Left-join `metrics` onto `geo` where `metrics[postcode_col] == geo.postcode`.
///
/// Every metrics row appears exactly once in the output, in input order.
/// Rows whose postcode is null or absent from `geo` keep their values and get
/// no polygon. An empty metrics table is not an error: the stats report
/// [`MatchStatus::NoData`].
pub fn join(
    metrics: &MetricsTable,
    geo: &GeometryTable,
    postcode_col: &str,
) -> Result<JoinOutcome, JoinError> {
    let key_index = metrics
        .column_index(postcode_col)
        .ok_or_else(|| JoinError::UnknownColumn(postcode_col.to_string()))?;

    let mut matched = 0;
    let rows: Vec<JoinedRow> = metrics
        .rows()
        .iter()
        .map(|values| {
            let geometry = values[key_index]
                .as_key()
                .and_then(|key| geo.get(&key))
                .map(|record| record.polygon.clone());
            if geometry.is_some() {
                matched += 1;
            }
            JoinedRow {
                values: values.clone(),
                geometry,
            }
        })
        .collect();

    let stats = MatchStats::new(matched, metrics.len());
    match stats.status {
        MatchStatus::NoData => warn!(postcode_col, "Join input has no rows"),
        MatchStatus::Joined => info!(
            postcode_col,
            matched = stats.matched_count,
            total = stats.total_count,
            "Geographic match rate: {}",
            stats
        ),
    }

    Ok(JoinOutcome {
        table: JoinedTable::new(metrics.columns().to_vec(), postcode_col.to_string(), rows),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{square, GeometryRecord};
    use crate::table::CellValue;

    fn metrics(postcodes: &[Option<&str>]) -> MetricsTable {
        let mut table = MetricsTable::new(["id", "Postcode"]);
        for (i, pc) in postcodes.iter().enumerate() {
            table
                .push_row(vec![
                    CellValue::Number(i as f64),
                    pc.map_or(CellValue::Null, |p| CellValue::Text(p.to_string())),
                ])
                .unwrap();
        }
        table
    }

    fn geo(postcodes: &[&str]) -> GeometryTable {
        postcodes
            .iter()
            .map(|pc| GeometryRecord::new(*pc, square(0.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_left_join_keeps_all_rows() {
        let m = metrics(&[Some("CB30DG"), Some("XX99ZZ"), None, Some("CB30DG")]);
        let outcome = join(&m, &geo(&["CB30DG"]), "Postcode").unwrap();

        assert_eq!(outcome.table.len(), m.len());
        assert_eq!(outcome.stats.matched_count, 2);
        assert_eq!(outcome.stats.total_count, 4);
        assert!((outcome.stats.match_rate - 0.5).abs() < 1e-12);

        let matched: Vec<bool> = outcome.table.rows().iter().map(|r| r.is_matched()).collect();
        assert_eq!(matched, vec![true, false, false, true]);
        // Metric values survive for unmatched rows
        assert_eq!(outcome.table.rows()[1].values[0], CellValue::Number(1.0));
    }

    #[test]
    fn test_join_against_empty_geometry() {
        let m = metrics(&[Some("CB30DG"), Some("EH1 1YZ")]);
        let outcome = join(&m, &GeometryTable::new(), "Postcode").unwrap();

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.stats.matched_count, 0);
        assert_eq!(outcome.stats.match_rate, 0.0);
        assert_eq!(outcome.stats.status, MatchStatus::Joined);
    }

    #[test]
    fn test_match_rate_37_of_100() {
        let postcodes: Vec<String> = (0..100).map(|i| format!("CB{} 1AA", i % 100)).collect();
        let rows: Vec<Option<&str>> = postcodes.iter().map(|p| Some(p.as_str())).collect();
        let m = metrics(&rows);
        let g = geo(&postcodes[..37].iter().map(String::as_str).collect::<Vec<_>>());

        let outcome = join(&m, &g, "Postcode").unwrap();
        assert_eq!(outcome.stats.matched_count, 37);
        assert_eq!(outcome.stats.match_rate, 0.37);
    }

    #[test]
    fn test_empty_metrics_reports_no_data() {
        let m = metrics(&[]);
        let outcome = join(&m, &geo(&["CB30DG"]), "Postcode").unwrap();

        assert!(outcome.table.is_empty());
        assert!(outcome.stats.is_no_data());
        assert_eq!(outcome.stats.match_rate, 0.0);
        assert_eq!(outcome.stats.to_string(), "no data");
    }

    #[test]
    fn test_unknown_column() {
        let m = metrics(&[Some("CB30DG")]);
        assert_eq!(
            join(&m, &geo(&[]), "pc").unwrap_err(),
            JoinError::UnknownColumn("pc".to_string())
        );
    }

    #[test]
    fn test_stats_display() {
        assert_eq!(MatchStats::new(1, 3).to_string(), "1/3 (33.3%)");
    }
}
