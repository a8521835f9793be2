//! Row selection by a column/value condition.

use crate::cell::CellValue;
use crate::error::{ColumnRole, Result, SheetError};
use crate::sheet::Sheet;

/// Selects rows whose `column` cell equals `value`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: CellValue,
}

/// Writes `value` into `column` of every selected row. An empty column name
/// means the condition column.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub column: String,
    pub value: CellValue,
}

impl Condition {
    pub fn new<C: Into<String>, V: Into<CellValue>>(column: C, value: V) -> Self {
        Condition {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether a cell satisfies the condition: non-empty, and its trimmed
    /// string form equals the trimmed condition value exactly.
    #[must_use]
    pub fn matches(&self, cell: &CellValue) -> bool {
        if cell.is_empty() {
            return false;
        }
        cell.as_str().trim() == self.value.as_str().trim()
    }
}

impl Mutation {
    pub fn new<C: Into<String>, V: Into<CellValue>>(column: C, value: V) -> Self {
        Mutation {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Find a column by trimmed, case-insensitive name; first match wins.
///
/// Blank entries (strict-mode placeholders) never match.
#[must_use]
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    headers
        .iter()
        .position(|header| header.trim().to_lowercase() == wanted)
}

fn require_column(headers: &[String], name: &str, role: ColumnRole) -> Result<usize> {
    find_column(headers, name).ok_or_else(|| SheetError::ColumnNotFound {
        role,
        name: name.to_string(),
        available: headers.iter().filter(|h| !h.is_empty()).cloned().collect(),
    })
}

impl Sheet {
    /// Update every data row that satisfies `condition`.
    ///
    /// Column indices come from `headers`, which must be the header list read
    /// from this sheet. Returns the number of rows updated; zero is not an
    /// error.
    pub fn find_and_update(
        &mut self,
        headers: &[String],
        condition: &Condition,
        mutation: &Mutation,
    ) -> Result<usize> {
        let condition_idx = require_column(headers, &condition.column, ColumnRole::Condition)?;
        let target_name = if mutation.column.is_empty() {
            condition.column.as_str()
        } else {
            mutation.column.as_str()
        };
        let target_idx = require_column(headers, target_name, ColumnRole::Target)?;

        let mut updated = 0usize;
        for row in self.data_rows_mut() {
            let cell = row.get(condition_idx).unwrap_or(&CellValue::Empty);
            if !condition.matches(cell) {
                continue;
            }
            if row.len() <= target_idx {
                row.resize(target_idx + 1, CellValue::Empty);
            }
            row[target_idx] = mutation.value.clone();
            updated += 1;
        }
        Ok(updated)
    }

    /// Remove every data row that satisfies `condition`, keeping the order of
    /// the rest. Returns the number of rows removed.
    pub fn find_and_remove(&mut self, headers: &[String], condition: &Condition) -> Result<usize> {
        let condition_idx = require_column(headers, &condition.column, ColumnRole::Condition)?;
        Ok(self.data_row_delete_where(|row| {
            condition.matches(row.get(condition_idx).unwrap_or(&CellValue::Empty))
        }))
    }
}
