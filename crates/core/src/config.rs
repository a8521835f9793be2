//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory relative file paths are resolved under.
pub const DEFAULT_BASE_DIR: &str = "/data/sheet-manager";
/// File used when an item does not name one.
pub const DEFAULT_FILE_PATH: &str = "/tmp/data.xlsx";

/// What to do with the remaining items after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchPolicy {
    #[default]
    AbortOnError,
    ContinueOnError,
}

/// Settings shared by every item the engine processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub base_dir: PathBuf,
    pub default_file_path: String,
    /// Written as the workbook creator on `create`
    pub creator: String,
    pub last_modified_by: String,
    pub batch_policy: BatchPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            default_file_path: DEFAULT_FILE_PATH.to_string(),
            creator: "Sheet Manager".to_string(),
            last_modified_by: "sheetman".to_string(),
            batch_policy: BatchPolicy::AbortOnError,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    #[must_use]
    pub fn with_default_file_path(mut self, path: impl Into<String>) -> Self {
        self.default_file_path = path.into();
        self
    }

    #[must_use]
    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }

    /// Resolve an item's file path: empty means the default file, absolute
    /// paths are used as given, anything else lives under `base_dir`.
    #[must_use]
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        let raw = if raw.trim().is_empty() {
            self.default_file_path.as_str()
        } else {
            raw
        };
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
