use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};

/// Per-column metadata attached to a sheet: the header text and the record key
/// the column is filled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    pub key: String,
}

impl ColumnSpec {
    /// Column whose header and key are the same name
    #[must_use]
    pub fn named(name: &str) -> Self {
        ColumnSpec {
            header: name.to_string(),
            key: name.to_string(),
        }
    }
}

/// A sheet representing a 2D grid of cells (row-major storage).
///
/// Row 0 is the header row; data rows start at index 1. Rows are not required
/// to have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    #[serde(default)]
    columns: Vec<ColumnSpec>,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            columns: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            columns: Vec::new(),
            data: converted,
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of physical rows, header row included
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of rows below the header row
    #[must_use]
    pub fn data_row_count(&self) -> usize {
        self.data.len().saturating_sub(1)
    }

    /// Get the width of the widest row
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ===== Column Metadata =====

    /// Get the per-column metadata
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Replace the column metadata and write the headers into row 0.
    ///
    /// Cells of the existing header row beyond the new column count are kept.
    pub fn set_columns(&mut self, columns: Vec<ColumnSpec>) {
        if self.data.is_empty() {
            self.data.push(Vec::new());
        }
        let header_row = &mut self.data[0];
        if header_row.len() < columns.len() {
            header_row.resize(columns.len(), CellValue::Empty);
        }
        for (idx, column) in columns.iter().enumerate() {
            header_row[idx] = CellValue::String(column.header.clone());
        }
        self.columns = columns;
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based).
    ///
    /// Positions outside a row read as empty.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.data.get(row).and_then(|r| r.get(col)).unwrap_or(EMPTY)
    }

    /// Set a cell value by row and column index (0-based), widening the row
    /// if needed.
    pub fn set<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let count = self.data.len();
        let cells = self
            .data
            .get_mut(row)
            .ok_or(SheetError::RowIndexOutOfBounds { index: row, count })?;
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value.into();
        Ok(())
    }

    // ===== Row Operations =====

    /// Get a row by index
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.data.len(),
        })
    }

    /// Get the header row, if any
    #[must_use]
    pub fn header_row(&self) -> Option<&Vec<CellValue>> {
        self.data.first()
    }

    /// Append a row at the end of the sheet
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) {
        self.data.push(data.into_iter().map(Into::into).collect());
    }

    /// Iterate data rows (every row after the header row) with their physical
    /// index
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<CellValue>)> {
        self.data.iter().enumerate().skip(1)
    }

    /// Iterate data rows mutably
    pub fn data_rows_mut(&mut self) -> impl Iterator<Item = &mut Vec<CellValue>> {
        self.data.iter_mut().skip(1)
    }

    /// Delete data rows matching a predicate; the header row is never passed
    /// to the predicate. Returns the number of rows removed.
    pub fn data_row_delete_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        let original = self.data.len();
        let mut index = 0usize;
        self.data.retain(|row| {
            let keep = index == 0 || !predicate(row);
            index += 1;
            keep
        });
        original - self.data.len()
    }

    /// Remove every row, header included, and drop the column metadata
    pub fn clear(&mut self) {
        self.data.clear();
        self.columns.clear();
    }

    /// Check whether every cell of a row is empty
    #[must_use]
    pub fn is_blank_row(row: &[CellValue]) -> bool {
        row.iter().all(CellValue::is_empty)
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}
