//! Header extraction and reconciliation.
//!
//! A sheet's column list can come from three places: the sheet already on disk,
//! an explicit override list, and the keys of the records being written.
//! [`HeaderSet::resolve`] merges them into one ordered, duplicate-free list.

use crate::cell::CellValue;
use crate::sheet::Sheet;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// An input record: field name to value, in the order the fields arrived.
pub type Record = IndexMap<String, CellValue>;

/// How the header row is scanned when a sheet has no column metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Blank header cells are dropped, so the list index can drift from the
    /// physical column index when a blank sits between named columns.
    #[default]
    Legacy,
    /// One entry per physical column; blank header cells become `""`.
    Strict,
}

impl Sheet {
    /// Extract the sheet's header names.
    ///
    /// Column metadata wins when it yields at least one non-blank header.
    /// Otherwise row 0 is scanned left to right, trimming each cell's string
    /// form.
    #[must_use]
    pub fn headers(&self, mode: HeaderMode) -> Vec<String> {
        let from_columns: Vec<String> = self
            .columns()
            .iter()
            .map(|col| col.header.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        if !from_columns.is_empty() {
            return from_columns;
        }

        let Some(first_row) = self.header_row() else {
            return Vec::new();
        };

        let scanned = first_row.iter().map(|cell| cell.as_str().trim().to_string());
        match mode {
            HeaderMode::Legacy => scanned.filter(|h| !h.is_empty()).collect(),
            HeaderMode::Strict => {
                let mut headers: Vec<String> = scanned.collect();
                // trailing blanks carry no column
                while headers.last().is_some_and(String::is_empty) {
                    headers.pop();
                }
                headers
            }
        }
    }
}

/// Ordered, duplicate-free list of column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    names: IndexSet<String>,
}

impl HeaderSet {
    /// Create an empty header set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge existing-sheet headers, user overrides and record keys.
    ///
    /// Sources are concatenated in that order and deduplicated keeping the
    /// first occurrence. Blank user overrides are ignored; record keys are
    /// taken verbatim.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(existing: &[S], user: &[S], records: &[Record]) -> Self {
        let mut set = HeaderSet::new();
        for name in existing {
            set.insert(name.as_ref());
        }
        for name in user {
            if !name.as_ref().is_empty() {
                set.insert(name.as_ref());
            }
        }
        for key in Self::record_keys(records) {
            set.insert(&key);
        }
        set
    }

    /// Collect the keys of every record, first occurrence wins position.
    #[must_use]
    pub fn record_keys(records: &[Record]) -> Vec<String> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for record in records {
            for key in record.keys() {
                seen.insert(key.as_str());
            }
        }
        seen.into_iter().map(str::to_string).collect()
    }

    /// Add a name; returns false if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::ColumnSpec;

    fn record(pairs: &[(&str, i64)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), CellValue::Int(*v)))
            .collect()
    }

    #[test]
    fn test_resolve_priority_order() {
        let existing = vec!["id".to_string(), "name".to_string()];
        let user = vec!["email".to_string(), "id".to_string()];
        let records = vec![record(&[("name", 1), ("age", 2)]), record(&[("zip", 3)])];

        let set = HeaderSet::resolve(&existing, &user, &records);
        assert_eq!(set.to_vec(), vec!["id", "name", "email", "age", "zip"]);
    }

    #[test]
    fn test_resolve_all_empty() {
        let none: Vec<String> = Vec::new();
        let set = HeaderSet::resolve(&none, &none, &[]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_resolve_skips_blank_user_headers() {
        let none: Vec<String> = Vec::new();
        let user = vec![String::new(), "b".to_string()];
        let set = HeaderSet::resolve(&none, &user, &[]);
        assert_eq!(set.to_vec(), vec!["b"]);
    }

    #[test]
    fn test_record_keys_first_seen() {
        let records = vec![
            record(&[("b", 1), ("a", 2)]),
            record(&[("c", 1), ("a", 2), ("b", 3)]),
        ];
        assert_eq!(HeaderSet::record_keys(&records), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_record_keys_are_case_sensitive() {
        let records = vec![record(&[("Name", 1)]), record(&[("name", 2)])];
        assert_eq!(HeaderSet::record_keys(&records), vec!["Name", "name"]);
    }

    #[test]
    fn test_headers_prefer_column_metadata() {
        let mut sheet = Sheet::from_data(vec![vec!["row", "scan"]]);
        sheet.set_columns(vec![ColumnSpec::named(" meta "), ColumnSpec::named("")]);
        // set_columns rewrites row 0, so write a different header row back
        sheet.set(0, 0, "other").unwrap();
        assert_eq!(sheet.headers(HeaderMode::Legacy), vec!["meta"]);
    }

    #[test]
    fn test_headers_blank_metadata_falls_back_to_row_scan() {
        let mut sheet = Sheet::from_data(vec![vec![" Name ", "Age"]]);
        sheet.set_columns(vec![ColumnSpec::named("  ")]);
        sheet.set(0, 0, " Name ").unwrap();
        assert_eq!(sheet.headers(HeaderMode::Legacy), vec!["Name", "Age"]);
    }

    #[test]
    fn test_legacy_scan_drops_interior_blanks() {
        let sheet = Sheet::from_data(vec![vec![
            CellValue::from("A"),
            CellValue::Empty,
            CellValue::from("  "),
            CellValue::from("D"),
        ]]);
        assert_eq!(sheet.headers(HeaderMode::Legacy), vec!["A", "D"]);
    }

    #[test]
    fn test_strict_scan_keeps_positions() {
        let sheet = Sheet::from_data(vec![vec![
            CellValue::from("A"),
            CellValue::Empty,
            CellValue::from("D"),
            CellValue::Empty,
        ]]);
        assert_eq!(sheet.headers(HeaderMode::Strict), vec!["A", "", "D"]);
    }

    #[test]
    fn test_headers_of_empty_sheet() {
        assert!(Sheet::new().headers(HeaderMode::Legacy).is_empty());
        assert!(Sheet::new().headers(HeaderMode::Strict).is_empty());
    }

    #[test]
    fn test_numeric_header_cells_use_string_form() {
        let sheet = Sheet::from_data(vec![vec![CellValue::Int(2024), CellValue::Float(1.5)]]);
        assert_eq!(sheet.headers(HeaderMode::Legacy), vec!["2024", "1.5"]);
    }
}
