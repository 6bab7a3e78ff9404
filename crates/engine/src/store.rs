//! Cell Store - canonical storage for grid data
//!
//! Storage space is addressed by (storage_row, storage_col). Rows are sparse:
//! a row record only holds the columns that were written, so an absent cell and
//! an empty string are different things.
//!
//! Every successful `set` bumps `revision` by exactly one, even when the new
//! value equals the old one. Readers compare revisions to decide whether they
//! need to re-fetch.

use rustc_hash::FxHashMap;

use crate::error::{GridError, Result};

/// One row record: storage column index -> value
pub type Row = FxHashMap<usize, String>;

#[derive(Debug, Clone)]
pub struct CellStore {
    columns: Vec<String>,
    rows: Vec<Row>,
    revision: u64,
}

impl CellStore {
    /// Synthetic store: `row_count` x `col_count` placeholder cells ("r:<i>:c:<j>")
    /// and column identifiers "Column:<j>".
    pub fn new(row_count: usize, col_count: usize) -> Self {
        let columns = (0..col_count).map(column_identifier).collect();
        let rows = (0..row_count)
            .map(|r| {
                let mut row = Row::with_capacity_and_hasher(col_count, Default::default());
                for c in 0..col_count {
                    row.insert(c, placeholder(r, c));
                }
                row
            })
            .collect();

        log::debug!("allocated synthetic store {}x{}", row_count, col_count);

        Self {
            columns,
            rows,
            revision: 1,
        }
    }

    /// Build a store from explicit, possibly sparse, row records.
    ///
    /// Fails if any record references a column outside `columns`.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let col_count = columns.len();
        for row in &rows {
            if let Some(&bad) = row.keys().find(|&&c| c >= col_count) {
                return Err(GridError::column(bad, col_count));
            }
        }

        Ok(Self {
            columns,
            rows,
            revision: 1,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Current data revision. Starts at 1.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Value at a storage coordinate; `None` if the row has no entry there.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<&str>> {
        self.check_bounds(row, col)?;
        Ok(self.rows[row].get(&col).map(String::as_str))
    }

    /// Overwrite a cell and return the new revision.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<u64> {
        self.check_bounds(row, col)?;
        self.rows[row].insert(col, value.into());
        self.revision += 1;
        log::trace!("set ({}, {}) -> revision {}", row, col, self.revision);
        Ok(self.revision)
    }

    /// Column identifiers in storage order.
    pub fn column_identifiers(&self) -> &[String] {
        &self.columns
    }

    pub fn column_identifier(&self, col: usize) -> Result<&str> {
        self.columns
            .get(col)
            .map(String::as_str)
            .ok_or_else(|| GridError::column(col, self.columns.len()))
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows.len() {
            return Err(GridError::row(row, self.rows.len()));
        }
        if col >= self.columns.len() {
            return Err(GridError::column(col, self.columns.len()));
        }
        Ok(())
    }
}

fn column_identifier(col: usize) -> String {
    format!("Column:{}", col)
}

fn placeholder(row: usize, col: usize) -> String {
    format!("r:{}:c:{}", row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;

    #[test]
    fn test_synthetic_store() {
        let store = CellStore::new(3, 2);
        assert_eq!(store.row_count(), 3);
        assert_eq!(store.col_count(), 2);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.column_identifiers(), &["Column:0", "Column:1"]);
        assert_eq!(store.get(2, 1).unwrap(), Some("r:2:c:1"));
    }

    #[test]
    fn test_set_bumps_revision_unconditionally() {
        let mut store = CellStore::new(2, 2);
        assert_eq!(store.set(0, 0, "x").unwrap(), 2);
        // Same value again still counts as a mutation
        assert_eq!(store.set(0, 0, "x").unwrap(), 3);
        assert_eq!(store.revision(), 3);
        assert_eq!(store.get(0, 0).unwrap(), Some("x"));
    }

    #[test]
    fn test_get_does_not_touch_revision() {
        let store = CellStore::new(2, 2);
        let _ = store.get(1, 1).unwrap();
        let _ = store.get(5, 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut store = CellStore::new(3, 2);
        assert_eq!(
            store.get(3, 0),
            Err(GridError::OutOfRange { axis: Axis::Row, index: 3, len: 3 })
        );
        assert_eq!(
            store.get(0, 2),
            Err(GridError::OutOfRange { axis: Axis::Column, index: 2, len: 2 })
        );
        assert!(store.set(9, 9, "nope").is_err());
        // Failed mutation leaves revision alone
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_sparse_rows_absent_vs_empty() {
        let mut first = Row::default();
        first.insert(0, String::new());
        let store = CellStore::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![first, Row::default()],
        )
        .unwrap();

        assert_eq!(store.get(0, 0).unwrap(), Some(""));
        assert_eq!(store.get(0, 1).unwrap(), None);
        assert_eq!(store.get(1, 0).unwrap(), None);
    }

    #[test]
    fn test_from_rows_rejects_unknown_column() {
        let mut row = Row::default();
        row.insert(4, "x".to_string());
        let err = CellStore::from_rows(vec!["a".to_string()], vec![row]).unwrap_err();
        assert_eq!(err, GridError::OutOfRange { axis: Axis::Column, index: 4, len: 1 });
    }

    #[test]
    fn test_column_identifier_lookup() {
        let store = CellStore::new(1, 3);
        assert_eq!(store.column_identifier(2).unwrap(), "Column:2");
        assert!(store.column_identifier(3).is_err());
    }
}
