//! The table operation engine.
//!
//! Each item loads its workbook through the codec, runs one operation on it,
//! and writes it back when something changed. Nothing is cached between
//! items.

use crate::config::{BatchPolicy, EngineConfig};
use crate::error::{IoAction, ManagerError, ManagerResult};
use crate::outcome::{Attachment, BatchReport, ItemReport, Outcome};
use crate::params::{ItemParams, Operation};
use crate::storage::Storage;
use chrono::Utc;
use serde_json::Value;
use sheetman_sheet::{
    normalize_records, records_from_json, row_cells, Book, CellValue, ColumnSpec, Condition,
    FillPolicy, HeaderMode, HeaderSet, Mutation, WorkbookCodec, XLSX_MIME_TYPE,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Runs batch items against a codec and a storage backend.
#[derive(Debug)]
pub struct Engine<C, S> {
    codec: C,
    storage: S,
    config: EngineConfig,
}

/// File name component of a path, for messages and attachments
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl<C: WorkbookCodec, S: Storage> Engine<C, S> {
    pub fn new(codec: C, storage: S, config: EngineConfig) -> Self {
        Engine {
            codec,
            storage,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Run every item in order, honouring the configured [`BatchPolicy`].
    pub fn run_batch(&mut self, items: &[Value]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, item) in items.iter().enumerate() {
            let result = ItemParams::from_json(item).and_then(|params| self.process(&params));
            let failed = result.is_err();
            if let Err(err) = &result {
                warn!(index, kind = ?err.kind(), "item failed: {err}");
            }
            report.items.push(ItemReport { index, result });

            if failed && self.config.batch_policy == BatchPolicy::AbortOnError {
                report.skipped = items.len() - index - 1;
                if report.skipped > 0 {
                    warn!(skipped = report.skipped, "aborting batch after failed item");
                }
                break;
            }
        }

        report
    }

    /// Run a single item.
    pub fn process(&mut self, params: &ItemParams) -> ManagerResult<Outcome> {
        let path = self.config.resolve_path(&params.file_path);
        info!(operation = %params.operation, path = %path.display(), "processing item");

        match params.operation {
            Operation::ReadFile => self.read_file(&path),
            Operation::View => self.view(&path, params),
            Operation::Create => self.create(&path, params),
            Operation::Edit => self.edit(&path, params),
            Operation::DeleteRows => self.delete_rows(&path, params),
            Operation::DeleteFile => self.delete_file(&path),
        }
    }

    // ===== Storage helpers =====

    fn read_bytes(&self, path: &Path) -> ManagerResult<Vec<u8>> {
        self.storage
            .read(path)
            .map_err(|e| ManagerError::io(IoAction::Read, path, e))
    }

    fn load_existing(&self, path: &Path) -> ManagerResult<Book> {
        if !self.storage.exists(path) {
            return Err(ManagerError::FileNotFound {
                file: base_name(path),
            });
        }
        let bytes = self.read_bytes(path)?;
        Ok(self.codec.decode(&bytes)?)
    }

    fn persist(&mut self, path: &Path, book: &Book) -> ManagerResult<()> {
        let bytes = self.codec.encode(book)?;
        self.storage
            .write(path, &bytes)
            .map_err(|e| ManagerError::io(IoAction::Write, path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "workbook written");
        Ok(())
    }

    fn attachment(path: &Path, data: Vec<u8>) -> Attachment {
        Attachment {
            data,
            mime_type: XLSX_MIME_TYPE.to_string(),
            file_name: base_name(path),
        }
    }

    fn condition(params: &ItemParams) -> Condition {
        Condition::new(
            params.condition_column.clone(),
            CellValue::from_json(&params.condition_value),
        )
    }

    fn existing_sheet_name(book: &Book, requested: &str) -> ManagerResult<String> {
        book.resolve_sheet_name(requested)
            .ok_or_else(|| ManagerError::SheetNotFound {
                sheet: requested.to_string(),
            })
    }

    // ===== Operations =====

    fn read_file(&self, path: &Path) -> ManagerResult<Outcome> {
        if !self.storage.exists(path) {
            let message = format!("The file \"{}\" does not exist.", base_name(path));
            warn!("{message}");
            return Ok(Outcome::soft_failure(message));
        }

        let bytes = self.read_bytes(path)?;
        Ok(Outcome::success(format!("Read \"{}\".", base_name(path)))
            .with_attachment(Self::attachment(path, bytes)))
    }

    fn view(&self, path: &Path, params: &ItemParams) -> ManagerResult<Outcome> {
        let book = self.load_existing(path)?;
        let sheet_name = Self::existing_sheet_name(&book, &params.sheet_name)?;
        let sheet = book.get_sheet(&sheet_name)?;

        let headers = sheet.headers(params.header_mode);
        let rows = sheet.view_rows(&headers);
        debug!(sheet = %sheet_name, headers = ?headers, rows = rows.len(), "sheet viewed");

        let bytes = self.codec.encode(&book)?;
        Ok(Outcome::success(format!(
            "Read {} rows from sheet \"{sheet_name}\".",
            rows.len()
        ))
        .with_rows(rows)
        .with_attachment(Self::attachment(path, bytes)))
    }

    fn create(&mut self, path: &Path, params: &ItemParams) -> ManagerResult<Outcome> {
        let records = records_from_json(&params.data)
            .map_err(|e| ManagerError::invalid_input(e.to_string()))?;

        let file_exists = self.storage.exists(path);
        let mut book = if file_exists {
            let bytes = self.read_bytes(path)?;
            self.codec.decode(&bytes)?
        } else {
            Book::new()
        };

        // An empty name never addresses an existing sheet here
        let (sheet_name, is_new_sheet) = if params.sheet_name.is_empty() {
            (book.unused_sheet_name(), true)
        } else {
            (params.sheet_name.clone(), !book.has_sheet(&params.sheet_name))
        };
        if is_new_sheet {
            book.add_empty_sheet(&sheet_name)?;
        }
        let sheet = book.get_sheet_mut(&sheet_name)?;

        let existing = if file_exists && params.append && !is_new_sheet {
            sheet.headers(HeaderMode::Legacy)
        } else {
            Vec::new()
        };
        let user = params.headers.names();
        let headers = HeaderSet::resolve(&existing, &user, &records);
        debug!(
            existing = existing.len(),
            user = user.len(),
            unified = ?headers.to_vec(),
            "headers resolved"
        );

        if !params.append {
            sheet.clear();
        }
        sheet.set_columns(headers.iter().map(ColumnSpec::named).collect());

        let fill = FillPolicy::from_setting(&params.default_fill_value);
        let rows = normalize_records(&records, &headers, &fill);
        let written = rows.len();
        for row in &rows {
            sheet.row_append(row_cells(row, &headers));
        }

        let now = Utc::now();
        let title = params
            .file_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map_or_else(|| base_name(path), str::to_string);
        let props = book.properties_mut();
        props.creator = Some(self.config.creator.clone());
        props.last_modified_by = Some(self.config.last_modified_by.clone());
        props.created = Some(now);
        props.modified = Some(now);
        props.title = Some(title);

        self.persist(path, &book)?;
        info!(sheet = %sheet_name, rows = written, append = params.append, "workbook saved");
        Ok(Outcome::success(format!(
            "File \"{}\" saved ({written} rows written to sheet \"{sheet_name}\").",
            base_name(path)
        )))
    }

    fn edit(&mut self, path: &Path, params: &ItemParams) -> ManagerResult<Outcome> {
        let mut book = self.load_existing(path)?;
        let sheet_name = Self::existing_sheet_name(&book, &params.sheet_name)?;
        let sheet = book.get_sheet_mut(&sheet_name)?;

        let headers = sheet.headers(params.header_mode);
        let condition = Self::condition(params);
        let mutation = Mutation::new(
            params.target_column.clone(),
            CellValue::from_json(&params.new_value),
        );
        let updated = sheet.find_and_update(&headers, &condition, &mutation)?;
        debug!(sheet = %sheet_name, updated, "condition applied");

        if updated == 0 {
            return Ok(Self::no_match(&condition));
        }

        self.persist(path, &book)?;
        Ok(Outcome::success(format!(
            "File updated: {updated} row(s) changed."
        )))
    }

    fn delete_rows(&mut self, path: &Path, params: &ItemParams) -> ManagerResult<Outcome> {
        let mut book = self.load_existing(path)?;
        let sheet_name = Self::existing_sheet_name(&book, &params.sheet_name)?;
        let sheet = book.get_sheet_mut(&sheet_name)?;

        let headers = sheet.headers(params.header_mode);
        let condition = Self::condition(params);
        let removed = sheet.find_and_remove(&headers, &condition)?;
        debug!(sheet = %sheet_name, removed, "condition applied");

        if removed == 0 {
            return Ok(Self::no_match(&condition));
        }

        self.persist(path, &book)?;
        Ok(Outcome::success(format!(
            "File updated: {removed} row(s) deleted."
        )))
    }

    fn no_match(condition: &Condition) -> Outcome {
        let message = format!(
            "No row found with value \"{}\" in column \"{}\".",
            condition.value, condition.column
        );
        warn!("{message}");
        Outcome::soft_failure(message)
    }

    fn delete_file(&mut self, path: &Path) -> ManagerResult<Outcome> {
        if !self.storage.exists(path) {
            let message = "The file does not exist, nothing to delete.".to_string();
            warn!(path = %path.display(), "{message}");
            return Ok(Outcome::soft_failure(message));
        }

        self.storage
            .remove(path)
            .map_err(|e| ManagerError::io(IoAction::Delete, path, e))?;
        Ok(Outcome::success(format!(
            "File \"{}\" deleted.",
            base_name(path)
        )))
    }
}
