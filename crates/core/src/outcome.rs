//! Per-item results.

use crate::error::{ErrorKind, ManagerError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use sheetman_sheet::{rows_to_json, Row};

/// A file returned with a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Raw bytes; base64 on the wire
    #[serde(serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

fn serialize_rows<S: Serializer>(rows: &Option<Vec<Row>>, serializer: S) -> Result<S::Ok, S::Error> {
    match rows {
        Some(rows) => rows_to_json(rows).serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Result of an item that ran to completion.
///
/// `success: false` marks a soft outcome (nothing to read, delete or match),
/// which never stops a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_rows"
    )]
    pub rows: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Outcome {
            success: true,
            message: message.into(),
            rows: None,
            attachment: None,
        }
    }

    pub fn soft_failure(message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            message: message.into(),
            rows: None,
            attachment: None,
        }
    }

    #[must_use]
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Result of one batch item.
#[derive(Debug)]
pub struct ItemReport {
    pub index: usize,
    pub result: Result<Outcome, ManagerError>,
}

impl ItemReport {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    /// JSON form: the outcome itself, or `{success: false, error, message}`
    /// for a failed item.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match &self.result {
            Ok(outcome) => serde_json::to_value(outcome).unwrap_or_else(|e| {
                json!({"success": false, "error": ErrorKind::Codec, "message": e.to_string()})
            }),
            Err(err) => json!({
                "success": false,
                "error": err.kind(),
                "message": err.to_string(),
            }),
        }
    }
}

/// Results of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
    /// Items left unprocessed after a failure under the abort policy
    pub skipped: usize,
}

impl BatchReport {
    #[must_use]
    pub fn failures(&self) -> usize {
        self.items.iter().filter(|item| item.is_failure()).count()
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Array(self.items.iter().map(ItemReport::to_json).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetman_sheet::CellValue;

    #[test]
    fn test_outcome_json() {
        let mut row = Row::new();
        row.insert("a".to_string(), CellValue::Int(1));
        row.insert("b".to_string(), CellValue::Empty);

        let outcome = Outcome::success("ok")
            .with_rows(vec![row])
            .with_attachment(Attachment {
                data: b"hi".to_vec(),
                mime_type: "text/plain".to_string(),
                file_name: "x.txt".to_string(),
            });

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "ok",
                "rows": [{"a": 1, "b": null}],
                "attachment": {"data": "aGk=", "mimeType": "text/plain", "fileName": "x.txt"}
            })
        );
    }

    #[test]
    fn test_soft_failure_omits_optional_fields() {
        let value = serde_json::to_value(Outcome::soft_failure("nothing")).unwrap();
        assert_eq!(value, json!({"success": false, "message": "nothing"}));
    }

    #[test]
    fn test_failed_item_json() {
        let report = ItemReport {
            index: 0,
            result: Err(ManagerError::invalid_input("bad data")),
        };
        assert!(report.is_failure());
        assert_eq!(
            report.to_json(),
            json!({"success": false, "error": "InvalidInput", "message": "Invalid input: bad data"})
        );
    }
}
