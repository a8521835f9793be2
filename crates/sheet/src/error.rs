use thiserror::Error;

/// Errors that can occur during sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error(
        "{role} column \"{name}\" was not found. Available headers: {}",
        .available.join(", ")
    )]
    ColumnNotFound {
        role: ColumnRole,
        name: String,
        available: Vec<String>,
    },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Invalid sheet name \"{name}\": {reason}")]
    InvalidSheetName { name: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("XLSX error: {0}")]
    Xlsx(String),
}

/// Which side of a condition/mutation pair a column lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Condition,
    Target,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::Condition => write!(f, "Condition"),
            ColumnRole::Target => write!(f, "Target"),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
