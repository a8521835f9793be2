//! JSON support for books and sheets
//!
//! Provides:
//! - [`JsonCodec`]: a [`WorkbookCodec`] that stores the whole book model as
//!   JSON, column metadata and document properties included
//! - Conversion of sheet data rows into JSON objects keyed by header

use crate::book::Book;
use crate::cell::CellValue;
use crate::codec::WorkbookCodec;
use crate::error::{Result, SheetError};
use crate::normalize::Row;
use crate::sheet::Sheet;
use serde_json::{Map, Value};

/// Stores books as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit indented JSON
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl WorkbookCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Book> {
        serde_json::from_slice(bytes)
            .map_err(|e| SheetError::Parse(format!("Invalid book JSON: {e}")))
    }

    fn encode(&self, book: &Book) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(book)
        } else {
            serde_json::to_vec(book)
        };
        encoded.map_err(|e| SheetError::Serialize(format!("JSON write error: {e}")))
    }
}

impl Sheet {
    /// Build one row per non-blank data row, keyed by `headers`.
    ///
    /// Cell `i` goes under `headers[i]`; cells past the end of the header list
    /// and cells under blank (strict-mode) headers are left out. A row with no
    /// non-empty cell is skipped.
    #[must_use]
    pub fn view_rows(&self, headers: &[String]) -> Vec<Row> {
        if headers.is_empty() {
            return Vec::new();
        }

        self.data_rows()
            .filter(|(_, cells)| !Sheet::is_blank_row(cells))
            .map(|(_, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, cell)| {
                        let header = headers.get(idx)?;
                        (!header.is_empty()).then(|| (header.clone(), cell.clone()))
                    })
                    .collect::<Row>()
            })
            .filter(|row| !row.is_empty())
            .collect()
    }
}

/// Convert a row into a JSON object
#[must_use]
pub fn row_to_json(row: &Row) -> Value {
    Value::Object(
        row.iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<Map<String, Value>>(),
    )
}

/// Convert rows into a JSON array of objects
#[must_use]
pub fn rows_to_json(rows: &[Row]) -> Value {
    Value::Array(rows.iter().map(row_to_json).collect())
}

/// Convert a JSON object into a row, keeping key order
#[must_use]
pub fn row_from_json(object: &Map<String, Value>) -> Row {
    object
        .iter()
        .map(|(k, v)| (k.clone(), CellValue::from_json(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderMode;
    use crate::sheet::ColumnSpec;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_json_codec_preserves_model() {
        let mut book = Book::new();
        book.properties_mut().title = Some("report".to_string());
        let sheet = book.add_empty_sheet("Data").unwrap();
        sheet.set_columns(vec![ColumnSpec::named("when"), ColumnSpec::named("n")]);
        let when = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        sheet.row_append(vec![CellValue::DateTime(when), CellValue::Int(1)]);
        sheet.row_append(vec![CellValue::Float(1.5), CellValue::Empty]);

        let codec = JsonCodec::new();
        let bytes = codec.encode(&book).unwrap();
        let decoded = codec.decode(&bytes).unwrap();

        assert_eq!(decoded, book);
        assert_eq!(decoded.get_sheet("Data").unwrap().columns().len(), 2);
    }

    #[test]
    fn test_json_codec_rejects_garbage() {
        let result = JsonCodec::new().decode(b"PK\x03\x04");
        assert!(matches!(result, Err(SheetError::Parse(_))));
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let bytes = JsonCodec::new().pretty(true).encode(&Book::new()).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains('\n'));
    }

    #[test]
    fn test_view_rows_skip_blank_rows() {
        let sheet = Sheet::from_data(vec![
            vec![CellValue::from("Name"), CellValue::from("Age")],
            vec![CellValue::from("Ana"), CellValue::Int(30)],
            vec![CellValue::Empty, CellValue::Empty],
            vec![CellValue::Empty, CellValue::Int(5)],
        ]);
        let headers = sheet.headers(HeaderMode::Legacy);
        let rows = sheet.view_rows(&headers);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], CellValue::from("Ana"));
        assert_eq!(rows[1]["Name"], CellValue::Empty);
        assert_eq!(rows[1]["Age"], CellValue::Int(5));
    }

    #[test]
    fn test_view_rows_without_headers() {
        let sheet = Sheet::from_data(vec![vec![CellValue::Empty], vec![CellValue::Int(1)]]);
        let headers = sheet.headers(HeaderMode::Legacy);
        assert!(sheet.view_rows(&headers).is_empty());
    }

    #[test]
    fn test_view_rows_drop_cells_past_headers() {
        let sheet = Sheet::from_data(vec![vec!["a"], vec!["1", "extra"]]);
        let rows = sheet.view_rows(&sheet.headers(HeaderMode::Legacy));
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0]["a"], CellValue::from("1"));
    }

    #[test]
    fn test_rows_to_json() {
        let sheet = Sheet::from_data(vec![
            vec![CellValue::from("x"), CellValue::from("y")],
            vec![CellValue::Int(1), CellValue::Empty],
        ]);
        let rows = sheet.view_rows(&sheet.headers(HeaderMode::Legacy));
        assert_eq!(rows_to_json(&rows), json!([{"x": 1, "y": null}]));
    }

    #[test]
    fn test_row_from_json() {
        let value = json!({"b": 1, "a": "s"});
        let row = row_from_json(value.as_object().unwrap());
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
