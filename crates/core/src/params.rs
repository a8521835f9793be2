//! Per-item parameters.

use crate::error::{ManagerError, ManagerResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sheetman_sheet::HeaderMode;

/// The operation an item asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    ReadFile,
    #[default]
    View,
    Create,
    Edit,
    DeleteRows,
    DeleteFile,
}

impl Operation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ReadFile => "readFile",
            Operation::View => "view",
            Operation::Create => "create",
            Operation::Edit => "edit",
            Operation::DeleteRows => "deleteRows",
            Operation::DeleteFile => "deleteFile",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the host's header collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    #[serde(default)]
    pub header: String,
}

/// User header overrides, either a plain list or the host's collection shape
/// `{"headersValues": [{"header": "..."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderOverrides {
    List(Vec<String>),
    Collection {
        #[serde(rename = "headersValues", default)]
        headers_values: Vec<HeaderEntry>,
    },
}

impl Default for HeaderOverrides {
    fn default() -> Self {
        HeaderOverrides::List(Vec::new())
    }
}

impl HeaderOverrides {
    /// Non-empty header names, in order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let all: Vec<&String> = match self {
            HeaderOverrides::List(names) => names.iter().collect(),
            HeaderOverrides::Collection { headers_values } => {
                headers_values.iter().map(|entry| &entry.header).collect()
            }
        };
        all.into_iter()
            .filter(|name| !name.is_empty())
            .cloned()
            .collect()
    }
}

fn default_fill_value() -> String {
    "null".to_string()
}

fn default_data() -> Value {
    Value::Array(Vec::new())
}

fn empty_string_value() -> Value {
    Value::String(String::new())
}

/// Parameters of one batch item.
///
/// Fields that do not apply to the requested operation are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemParams {
    #[serde(default)]
    pub operation: Operation,
    #[serde(default)]
    pub file_path: String,
    /// Title written into the workbook properties on `create`. Does not
    /// change where the file is stored.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub sheet_name: String,
    #[serde(default)]
    pub append: bool,
    #[serde(default)]
    pub headers: HeaderOverrides,
    #[serde(default = "default_fill_value")]
    pub default_fill_value: String,
    #[serde(default = "default_data")]
    pub data: Value,
    #[serde(default)]
    pub condition_column: String,
    #[serde(default = "empty_string_value")]
    pub condition_value: Value,
    #[serde(default)]
    pub target_column: String,
    #[serde(default = "empty_string_value")]
    pub new_value: Value,
    #[serde(default)]
    pub header_mode: HeaderMode,
}

impl Default for ItemParams {
    fn default() -> Self {
        ItemParams {
            operation: Operation::default(),
            file_path: String::new(),
            file_name: None,
            sheet_name: String::new(),
            append: false,
            headers: HeaderOverrides::default(),
            default_fill_value: default_fill_value(),
            data: default_data(),
            condition_column: String::new(),
            condition_value: empty_string_value(),
            target_column: String::new(),
            new_value: empty_string_value(),
            header_mode: HeaderMode::default(),
        }
    }
}

impl ItemParams {
    /// Create parameters for an operation with every other field defaulted
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        ItemParams {
            operation,
            ..Self::default()
        }
    }

    /// Parse one item from its JSON form.
    pub fn from_json(value: &Value) -> ManagerResult<Self> {
        Self::deserialize(value)
            .map_err(|e| ManagerError::invalid_input(format!("invalid item parameters: {e}")))
    }

    #[must_use]
    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = path.into();
        self
    }

    #[must_use]
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    #[must_use]
    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    #[must_use]
    pub fn condition(mut self, column: impl Into<String>, value: Value) -> Self {
        self.condition_column = column.into();
        self.condition_value = value;
        self
    }

    #[must_use]
    pub fn update(mut self, target_column: impl Into<String>, new_value: Value) -> Self {
        self.target_column = target_column.into();
        self.new_value = new_value;
        self
    }
}
