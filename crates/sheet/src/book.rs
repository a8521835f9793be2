use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Workbook-level document properties written alongside the sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

/// A book containing multiple sheets (preserves insertion order)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    properties: DocumentProperties,
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the document properties
    #[must_use]
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Get the document properties mutably
    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check if a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Iterate sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = (&String, &Sheet)> {
        self.sheets.iter()
    }

    /// Resolve a requested sheet name to the name of an existing sheet.
    ///
    /// Non-empty names match exactly; an empty name addresses the first sheet.
    #[must_use]
    pub fn resolve_sheet_name(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return self.sheets.keys().next().cloned();
        }
        self.sheets.contains_key(name).then(|| name.to_string())
    }

    // ===== Sheet Access =====

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a mutable sheet by name
    pub fn get_sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    // ===== Sheet Management =====

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SheetError::InvalidSheetName {
                name: name.to_string(),
                reason: "sheet names cannot be blank".to_string(),
            });
        }
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Add a new empty sheet with the given name
    pub fn add_empty_sheet(&mut self, name: &str) -> Result<&mut Sheet> {
        self.add_sheet(name, Sheet::new())?;
        self.get_sheet_mut(name)
    }

    /// First `SheetN` name (counting from 1) not used by any sheet
    #[must_use]
    pub fn unused_sheet_name(&self) -> String {
        let mut n = 1;
        loop {
            let name = format!("Sheet{n}");
            if !self.has_sheet(&name) {
                return name;
            }
            n += 1;
        }
    }
}
