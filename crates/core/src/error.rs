//! Error types for sheetman.

use serde::Serialize;
use sheetman_sheet::{ColumnRole, SheetError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sheetman operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Storage action that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
    Delete,
}

impl fmt::Display for IoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoAction::Read => write!(f, "read"),
            IoAction::Write => write!(f, "write"),
            IoAction::Delete => write!(f, "delete"),
        }
    }
}

/// Errors that fail a batch item.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The addressed file does not exist.
    #[error("The file \"{file}\" does not exist")]
    FileNotFound { file: String },

    /// The addressed sheet does not exist in the file.
    #[error("The sheet \"{sheet}\" does not exist in the file")]
    SheetNotFound { sheet: String },

    /// Malformed item parameters or data payload.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A condition or target column is missing from the sheet's headers.
    #[error(
        "{role} column \"{column}\" was not found. Available headers: {}",
        .available.join(", ")
    )]
    ColumnNotFound {
        role: ColumnRole,
        column: String,
        available: Vec<String>,
    },

    /// Storage read/write/delete failure.
    #[error("Could not {action} \"{}\": {source}", .path.display())]
    Io {
        action: IoAction,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook could not be decoded or encoded.
    #[error("Workbook error: {0}")]
    Codec(SheetError),
}

/// Coarse classification of [`ManagerError`], reported alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    ColumnNotFound,
    IoFailure,
    Codec,
}

impl ManagerError {
    /// Create an input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a storage error.
    pub fn io(action: IoAction, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } | Self::SheetNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::Codec(_) => ErrorKind::Codec,
        }
    }
}

impl From<SheetError> for ManagerError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::ColumnNotFound {
                role,
                name,
                available,
            } => Self::ColumnNotFound {
                role,
                column: name,
                available,
            },
            SheetError::SheetNotFound { name } => Self::SheetNotFound { sheet: name },
            other => Self::Codec(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_conversion() {
        let err: ManagerError = SheetError::ColumnNotFound {
            role: ColumnRole::Target,
            name: "Zip".to_string(),
            available: vec!["Name".to_string(), "Age".to_string()],
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
        assert_eq!(
            err.to_string(),
            "Target column \"Zip\" was not found. Available headers: Name, Age"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            ManagerError::FileNotFound {
                file: "a.xlsx".to_string()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ManagerError::from(SheetError::SheetNotFound {
                name: "S".to_string()
            })
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ManagerError::from(SheetError::Xlsx("bad".to_string())).kind(),
            ErrorKind::Codec
        );
        assert_eq!(
            ManagerError::invalid_input("x").kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_io_message() {
        let err = ManagerError::io(
            IoAction::Delete,
            "/data/a.xlsx",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert_eq!(err.to_string(), "Could not delete \"/data/a.xlsx\": denied");
    }
}
