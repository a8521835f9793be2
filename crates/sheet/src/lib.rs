//! Sheet/Book model for sheetman
//!
//! Provides the in-memory workbook model and the table logic that runs on it:
//! reconciling header lists, laying records out as rows, and selecting rows by
//! a column condition. Workbooks are read and written through the
//! [`WorkbookCodec`] trait, with `.xlsx` and JSON implementations.
//!
//! # Examples
//!
//! ## Reconciling headers and normalizing records
//!
//! ```
//! use sheetman_sheet::{normalize_records, records_from_json, CellValue, FillPolicy, HeaderSet};
//! use serde_json::json;
//!
//! let records = records_from_json(&json!([{"a": 1}, {"b": 2}])).unwrap();
//! let existing: Vec<String> = Vec::new();
//! let headers = HeaderSet::resolve(&existing, &[], &records);
//! assert_eq!(headers.to_vec(), vec!["a", "b"]);
//!
//! let rows = normalize_records(&records, &headers, &FillPolicy::from_setting("null"));
//! assert_eq!(rows[0]["b"], CellValue::Empty);
//! assert_eq!(rows[1]["b"], CellValue::Int(2));
//! ```
//!
//! ## Updating rows by condition
//!
//! ```
//! use sheetman_sheet::{CellValue, Condition, HeaderMode, Mutation, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec![CellValue::from("Name"), CellValue::from("Age")],
//!     vec![CellValue::from("Ana"), CellValue::Int(30)],
//!     vec![CellValue::from("ana"), CellValue::Int(31)],
//! ]);
//!
//! let headers = sheet.headers(HeaderMode::Legacy);
//! let updated = sheet
//!     .find_and_update(&headers, &Condition::new("name", "Ana"), &Mutation::new("Age", 99))
//!     .unwrap();
//!
//! assert_eq!(updated, 1);
//! assert_eq!(sheet.get(1, 1), &CellValue::Int(99));
//! ```

mod book;
mod cell;
mod codec;
mod error;
mod headers;
mod json;
mod matcher;
mod normalize;
mod sheet;
#[cfg(not(target_arch = "wasm32"))]
mod xlsx;

/// Re-export book types.
pub use book::{Book, DocumentProperties};
/// Re-export cell value type.
pub use cell::{CellValue, DATETIME_FORMAT};
/// Re-export the codec trait.
pub use codec::WorkbookCodec;
/// Re-export sheet error types.
pub use error::{ColumnRole, Result, SheetError};
/// Re-export header reconciliation.
pub use headers::{HeaderMode, HeaderSet, Record};
/// Re-export JSON codec and row conversion.
pub use json::{row_from_json, row_to_json, rows_to_json, JsonCodec};
/// Re-export row matching.
pub use matcher::{find_column, Condition, Mutation};
/// Re-export record normalization.
pub use normalize::{normalize_records, records_from_json, row_cells, FillPolicy, Row};
/// Re-export sheet type.
pub use sheet::{ColumnSpec, Sheet};
#[cfg(not(target_arch = "wasm32"))]
/// Re-export the XLSX codec (non-WASM only).
pub use xlsx::{XlsxCodec, XLSX_MIME_TYPE};
