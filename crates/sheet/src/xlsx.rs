use crate::book::{Book, DocumentProperties};
use crate::cell::CellValue;
use crate::codec::WorkbookCodec;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rust_xlsxwriter::{DocProperties, Format, Workbook, Worksheet};
use std::io::Cursor;

/// MIME type of an `.xlsx` workbook
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Number format applied to date-time cells on write
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Custom document property names for fields docProps/core.xml cannot hold
const LAST_MODIFIED_BY_PROPERTY: &str = "LastModifiedBy";
const MODIFIED_PROPERTY: &str = "Modified";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Largest float that still converts to an integer without loss (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Reads `.xlsx` workbooks with calamine and writes them with rust_xlsxwriter.
///
/// Column metadata and document properties are not read back: after a decode
/// the header row is the only source of headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxCodec;

impl XlsxCodec {
    #[must_use]
    pub fn new() -> Self {
        XlsxCodec
    }
}

fn xlsx_error(e: impl std::fmt::Display) -> SheetError {
    SheetError::Xlsx(e.to_string())
}

/// Day zero of the 1900 date system as used by Excel serial numbers
fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    excel_epoch().checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    (*dt - excel_epoch()).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Map workbook properties onto the xlsx writer's.
///
/// The writer derives `lastModifiedBy` and `modified` in docProps/core.xml
/// from the author and creation time, so those two are also kept as custom
/// properties.
fn doc_properties(props: &DocumentProperties) -> DocProperties {
    let mut doc = DocProperties::new();
    if let Some(title) = &props.title {
        doc = doc.set_title(title);
    }
    if let Some(creator) = &props.creator {
        doc = doc.set_author(creator);
    }
    if let Some(created) = &props.created {
        doc = doc.set_creation_datetime(created);
    }
    if let Some(name) = &props.last_modified_by {
        doc = doc.set_custom_property(LAST_MODIFIED_BY_PROPERTY, name);
    }
    if let Some(modified) = &props.modified {
        doc = doc.set_custom_property(MODIFIED_PROPERTY, modified);
    }
    doc
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => {
            // xlsx stores every number as a double; give whole numbers back as integers
            if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .parse::<NaiveDateTime>()
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

impl XlsxCodec {
    /// Write sheet data to a worksheet
    fn write_sheet(worksheet: &mut Worksheet, name: &str, sheet: &Sheet) -> Result<()> {
        worksheet.set_name(name).map_err(xlsx_error)?;
        let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);

        for (row_idx, row) in sheet.data().iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| xlsx_error("Row index overflow"))?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num =
                    u16::try_from(col_idx).map_err(|_| xlsx_error("Column index overflow"))?;

                match cell {
                    CellValue::Empty => {} // Leave empty
                    CellValue::Bool(b) => {
                        worksheet
                            .write_boolean(row_num, col_num, *b)
                            .map_err(xlsx_error)?;
                    }
                    CellValue::Int(i) => {
                        // Note: Excel stores all numbers as f64, so integers > 2^53
                        // may lose precision
                        worksheet
                            .write_number(row_num, col_num, *i as f64)
                            .map_err(xlsx_error)?;
                    }
                    CellValue::Float(f) => {
                        worksheet
                            .write_number(row_num, col_num, *f)
                            .map_err(xlsx_error)?;
                    }
                    CellValue::String(s) => {
                        worksheet
                            .write_string(row_num, col_num, s)
                            .map_err(xlsx_error)?;
                    }
                    CellValue::DateTime(dt) => {
                        worksheet
                            .write_number_with_format(
                                row_num,
                                col_num,
                                datetime_to_serial(dt),
                                &datetime_format,
                            )
                            .map_err(xlsx_error)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl WorkbookCodec for XlsxCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Book> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(xlsx_error)?;

        let sheet_names: Vec<String> = workbook.sheet_names().iter().map(|s| s.to_string()).collect();
        let mut book = Book::new();

        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name).map_err(xlsx_error)?;

            // calamine ranges start at the first used cell; anchor the grid at A1
            let (start_row, start_col) = range.start().unwrap_or((0, 0));
            let mut data: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];

            for row in range.rows() {
                let mut row_data = vec![CellValue::Empty; start_col as usize];
                row_data.extend(row.iter().map(data_to_cell_value));
                data.push(row_data);
            }

            book.add_sheet(&sheet_name, Sheet::from_data(data))?;
        }

        Ok(book)
    }

    fn encode(&self, book: &Book) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        workbook.set_properties(&doc_properties(book.properties()));

        for (name, sheet) in book.sheets() {
            let worksheet = workbook.add_worksheet();
            Self::write_sheet(worksheet, name, sheet)?;
        }

        workbook.save_to_buffer().map_err(xlsx_error)
    }
}
