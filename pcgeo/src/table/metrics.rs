//! The metrics table itself.

use std::collections::HashSet;

use super::cell::CellValue;
use super::TableError;

/// Column-named rows of loosely typed cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl MetricsTable {
    /// Create an empty table with the given header.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; its width must match the header.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &CellValue>, TableError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }

    /// Columns whose non-null cells are all numbers (and at least one exists).
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let mut seen_number = false;
                for row in &self.rows {
                    match &row[*i] {
                        CellValue::Number(_) => seen_number = true,
                        CellValue::Null => {}
                        CellValue::Text(_) => return false,
                    }
                }
                seen_number
            })
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Distinct non-null postcodes of a column in first-seen order, trimmed.
    pub fn unique_postcodes(&self, column: &str) -> Result<Vec<String>, TableError> {
        let mut seen = HashSet::new();
        Ok(self
            .column(column)?
            .filter_map(CellValue::as_key)
            .filter(|key| seen.insert(key.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetricsTable {
        let mut table = MetricsTable::new(["Postcode", "PPI", "label"]);
        table
            .push_row(vec![
                CellValue::Text("CB30DG".into()),
                CellValue::Number(1.0),
                CellValue::Text("a".into()),
            ])
            .unwrap();
        table
            .push_row(vec![
                CellValue::Text("EH1 1YZ".into()),
                CellValue::Null,
                CellValue::Text("b".into()),
            ])
            .unwrap();
        table
            .push_row(vec![
                CellValue::Text(" CB30DG".into()),
                CellValue::Number(3.0),
                CellValue::Null,
            ])
            .unwrap();
        table
            .push_row(vec![CellValue::Null, CellValue::Number(4.0), CellValue::Null])
            .unwrap();
        table
    }

    #[test]
    fn test_row_width_enforced() {
        let mut table = MetricsTable::new(["a", "b"]);
        let err = table.push_row(vec![CellValue::Null]).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowWidth {
                expected: 2,
                found: 1
            }
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_column_access() {
        let table = sample();
        assert_eq!(table.len(), 4);
        assert_eq!(table.column_index("PPI"), Some(1));
        let ppi: Vec<Option<f64>> = table.column("PPI").unwrap().map(|c| c.as_f64()).collect();
        assert_eq!(ppi, vec![Some(1.0), None, Some(3.0), Some(4.0)]);
        assert!(matches!(
            table.column("missing"),
            Err(TableError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_numeric_columns() {
        let table = sample();
        assert_eq!(table.numeric_columns(), vec!["PPI"]);
    }

    #[test]
    fn test_all_null_column_is_not_numeric() {
        let mut table = MetricsTable::new(["x"]);
        table.push_row(vec![CellValue::Null]).unwrap();
        assert!(table.numeric_columns().is_empty());
    }

    #[test]
    fn test_unique_postcodes_drop_nulls_and_trim() {
        let table = sample();
        assert_eq!(
            table.unique_postcodes("Postcode").unwrap(),
            vec!["CB30DG".to_string(), "EH1 1YZ".to_string()]
        );
    }
}
