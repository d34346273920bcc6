//! The joined table and metric helpers used by map consumers.

use geo_types::MultiPolygon;

use super::JoinError;
use crate::table::CellValue;

/// One metrics row with its polygon, if matched.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    /// Metric values in [`JoinedTable::columns`] order.
    pub values: Vec<CellValue>,
    pub geometry: Option<MultiPolygon<f64>>,
}

impl JoinedRow {
    /// True when the row received a polygon.
    pub fn is_matched(&self) -> bool {
        self.geometry.is_some()
    }
}

/// Numeric summary of one metric over matched rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Metrics table left-joined with geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedTable {
    columns: Vec<String>,
    postcode_column: String,
    rows: Vec<JoinedRow>,
}

impl JoinedTable {
    pub(super) fn new(columns: Vec<String>, postcode_column: String, rows: Vec<JoinedRow>) -> Self {
        Self {
            columns,
            postcode_column,
            rows,
        }
    }

    /// Metric column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The column used as the join key.
    pub fn postcode_column(&self) -> &str {
        &self.postcode_column
    }

    /// All rows in input order.
    pub fn rows(&self) -> &[JoinedRow] {
        &self.rows
    }

    /// Number of rows (always the metrics table's row count).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True for an empty join.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that received a polygon.
    pub fn matched_rows(&self) -> impl Iterator<Item = &JoinedRow> {
        self.rows.iter().filter(|r| r.is_matched())
    }

    /// Position of a metric column.
    pub fn column_index(&self, name: &str) -> Result<usize, JoinError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| JoinError::UnknownColumn(name.to_string()))
    }

    /// Count, min, max and mean of a numeric column over matched rows.
    ///
    /// Returns `None` when no matched row has a number in that column.
    pub fn metric_summary(&self, column: &str) -> Result<Option<MetricSummary>, JoinError> {
        let index = self.column_index(column)?;
        let mut summary: Option<MetricSummary> = None;
        let mut sum = 0.0;

        for value in self.matched_rows().filter_map(|r| r.values[index].as_f64()) {
            sum += value;
            summary = Some(match summary {
                None => MetricSummary {
                    count: 1,
                    min: value,
                    max: value,
                    mean: 0.0,
                },
                Some(s) => MetricSummary {
                    count: s.count + 1,
                    min: s.min.min(value),
                    max: s.max.max(value),
                    mean: 0.0,
                },
            });
        }

        Ok(summary.map(|s| MetricSummary {
            mean: sum / s.count as f64,
            ..s
        }))
    }

    /// Keep rows whose numeric value in `column` lies in `[min, max]`.
    ///
    /// Rows with a non-numeric value are dropped.
    pub fn filter_range(&self, column: &str, min: f64, max: f64) -> Result<JoinedTable, JoinError> {
        let index = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|r| {
                r.values[index]
                    .as_f64()
                    .is_some_and(|v| v >= min && v <= max)
            })
            .cloned()
            .collect();
        Ok(Self::new(self.columns.clone(), self.postcode_column.clone(), rows))
    }

    /// The `n` matched rows with the largest value in `column`, descending.
    pub fn top_n(&self, column: &str, n: usize) -> Result<Vec<&JoinedRow>, JoinError> {
        let index = self.column_index(column)?;
        let mut ranked: Vec<(f64, &JoinedRow)> = self
            .matched_rows()
            .filter_map(|r| r.values[index].as_f64().map(|v| (v, r)))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(ranked.into_iter().take(n).map(|(_, r)| r).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::square;

    fn row(pc: &str, ppi: Option<f64>, matched: bool) -> JoinedRow {
        JoinedRow {
            values: vec![
                CellValue::Text(pc.to_string()),
                ppi.map_or(CellValue::Null, CellValue::Number),
            ],
            geometry: matched.then(|| square(0.0, 0.0)),
        }
    }

    fn table() -> JoinedTable {
        JoinedTable::new(
            vec!["postcode".into(), "PPI".into()],
            "postcode".into(),
            vec![
                row("A1 1AA", Some(2.0), true),
                row("A1 1AB", Some(8.0), true),
                row("A1 1AC", None, true),
                row("A1 1AD", Some(100.0), false),
                row("A1 1AE", Some(5.0), true),
            ],
        )
    }

    #[test]
    fn test_metric_summary_over_matched_rows() {
        let summary = table().metric_summary("PPI").unwrap().unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 8.0);
        assert_eq!(summary.mean, 5.0);
    }

    #[test]
    fn test_metric_summary_non_numeric() {
        assert_eq!(table().metric_summary("postcode").unwrap(), None);
        assert!(table().metric_summary("nope").is_err());
    }

    #[test]
    fn test_filter_range_inclusive() {
        let filtered = table().filter_range("PPI", 5.0, 100.0).unwrap();
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered.postcode_column(), "postcode");
    }

    #[test]
    fn test_top_n_descending_matched_only() {
        let t = table();
        let top = t.top_n("PPI", 2).unwrap();
        let postcodes: Vec<String> = top.iter().map(|r| r.values[0].to_string()).collect();
        assert_eq!(postcodes, vec!["A1 1AB", "A1 1AE"]);
    }

    #[test]
    fn test_matched_rows() {
        assert_eq!(table().matched_rows().count(), 4);
    }
}
