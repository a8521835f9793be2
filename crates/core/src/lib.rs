//! # sheetman-core
//!
//! Batch engine for spreadsheet files.
//!
//! This crate provides:
//! - Per-item parameters and results
//! - The storage port, with filesystem and in-memory backends
//! - The engine dispatching `readFile`, `view`, `create`, `edit`,
//!   `deleteRows` and `deleteFile`
//! - Error types
//!
//! ```
//! use serde_json::json;
//! use sheetman_core::{Engine, EngineConfig, MemoryStorage};
//! use sheetman_sheet::JsonCodec;
//!
//! let mut engine = Engine::new(JsonCodec::new(), MemoryStorage::new(), EngineConfig::default());
//! let report = engine.run_batch(&[
//!     json!({"operation": "create", "filePath": "people.xlsx", "data": [{"Name": "Ana"}]}),
//!     json!({"operation": "view", "filePath": "people.xlsx"}),
//! ]);
//! assert_eq!(report.failures(), 0);
//! ```

/// Engine configuration.
pub mod config;
/// The operation engine.
pub mod engine;
/// Error types and result aliases.
pub mod error;
/// Item and batch results.
pub mod outcome;
/// Item parameters.
pub mod params;
/// Storage backends.
pub mod storage;

pub use config::{BatchPolicy, EngineConfig, DEFAULT_BASE_DIR, DEFAULT_FILE_PATH};
pub use engine::Engine;
pub use error::{ErrorKind, IoAction, ManagerError, ManagerResult};
pub use outcome::{Attachment, BatchReport, ItemReport, Outcome};
pub use params::{HeaderEntry, HeaderOverrides, ItemParams, Operation};
pub use storage::{FsStorage, MemoryStorage, Storage};
