use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::headers::{HeaderSet, Record};
use crate::json::row_from_json;
use indexmap::IndexMap;
use serde_json::Value;

/// A record laid out against a header set: one entry per header, in order.
pub type Row = IndexMap<String, CellValue>;

/// Value written for headers a record does not carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FillPolicy {
    #[default]
    Empty,
    Literal(String),
}

impl FillPolicy {
    /// Parse the user-facing fill setting: the token `null` means empty, any
    /// other string is written verbatim.
    #[must_use]
    pub fn from_setting(raw: &str) -> Self {
        if raw == "null" {
            FillPolicy::Empty
        } else {
            FillPolicy::Literal(raw.to_string())
        }
    }

    /// The cell written for an absent field
    #[must_use]
    pub fn value(&self) -> CellValue {
        match self {
            FillPolicy::Empty => CellValue::Empty,
            FillPolicy::Literal(s) => CellValue::String(s.clone()),
        }
    }
}

/// Lay every record out against `headers`.
///
/// Lookup is by exact key, no case folding or trimming. Records are never
/// dropped: one with no matching keys becomes a row of fill values.
#[must_use]
pub fn normalize_records(records: &[Record], headers: &HeaderSet, fill: &FillPolicy) -> Vec<Row> {
    records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|header| {
                    let value = record.get(header).cloned().unwrap_or_else(|| fill.value());
                    (header.to_string(), value)
                })
                .collect()
        })
        .collect()
}

/// Flatten a normalized row into cells in header order
#[must_use]
pub fn row_cells(row: &Row, headers: &HeaderSet) -> Vec<CellValue> {
    headers
        .iter()
        .map(|header| row.get(header).cloned().unwrap_or_default())
        .collect()
}

/// Decode a JSON payload into records.
///
/// The payload may be an array of objects, or a string holding the JSON text
/// of one.
pub fn records_from_json(payload: &Value) -> Result<Vec<Record>> {
    let decoded;
    let value = match payload {
        Value::String(text) => {
            decoded = serde_json::from_str::<Value>(text)
                .map_err(|e| SheetError::Parse(format!("data is not valid JSON: {e}")))?;
            &decoded
        }
        other => other,
    };

    let array = value
        .as_array()
        .ok_or_else(|| SheetError::Parse("data must be an array of objects".to_string()))?;

    array
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let obj = item.as_object().ok_or_else(|| {
                SheetError::Parse(format!("data element at index {idx} must be an object"))
            })?;
            Ok(row_from_json(obj))
        })
        .collect()
}
