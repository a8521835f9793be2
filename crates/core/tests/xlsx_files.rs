use chrono::NaiveDate;
use serde_json::json;
use sheetman_core::{Engine, EngineConfig, FsStorage, ItemParams, Operation};
use sheetman_sheet::{CellValue, HeaderMode, WorkbookCodec, XlsxCodec};
use tempfile::tempdir;

fn engine(base: &std::path::Path) -> Engine<XlsxCodec, FsStorage> {
    Engine::new(
        XlsxCodec::new(),
        FsStorage::new(),
        EngineConfig::default().with_base_dir(base),
    )
}

#[test]
fn test_xlsx_lifecycle_on_disk() {
    let dir = tempdir().unwrap();
    let mut engine = engine(dir.path());
    let path = dir.path().join("reports/people.xlsx");

    let report = engine.run_batch(&[
        json!({
            "operation": "create",
            "filePath": "reports/people.xlsx",
            "sheetName": "People",
            "data": [
                {"Name": "Ana", "Age": 30, "Active": true},
                {"Name": "ana", "Age": 31.5}
            ]
        }),
        json!({
            "operation": "edit",
            "filePath": "reports/people.xlsx",
            "sheetName": "People",
            "conditionColumn": "name",
            "conditionValue": "Ana",
            "targetColumn": "age",
            "newValue": 99
        }),
        json!({
            "operation": "create",
            "filePath": "reports/people.xlsx",
            "sheetName": "People",
            "append": true,
            "data": [{"City": "Oslo"}]
        }),
    ]);
    assert_eq!(report.failures(), 0, "{:?}", report.to_json());
    assert!(path.is_file());

    let outcome = engine
        .process(
            &ItemParams::new(Operation::View)
                .file_path("reports/people.xlsx")
                .sheet_name("People"),
        )
        .unwrap();
    let rows = serde_json::to_value(&outcome).unwrap()["rows"].clone();
    assert_eq!(
        rows,
        json!([
            {"Name": "Ana", "Age": 99, "Active": true, "City": null},
            {"Name": "ana", "Age": 31.5, "Active": null, "City": null},
            {"Name": null, "Age": null, "Active": null, "City": "Oslo"}
        ])
    );

    let attachment = outcome.attachment.unwrap();
    assert_eq!(attachment.file_name, "people.xlsx");
    let book = XlsxCodec::new().decode(&attachment.data).unwrap();
    assert_eq!(
        book.get_sheet("People").unwrap().headers(HeaderMode::Legacy),
        vec!["Name", "Age", "Active", "City"]
    );
}

#[test]
fn test_xlsx_read_and_delete_file() {
    let dir = tempdir().unwrap();
    let mut engine = engine(dir.path());
    engine
        .process(
            &ItemParams::new(Operation::Create)
                .file_path("a.xlsx")
                .data(json!([{"When": "x"}])),
        )
        .unwrap();

    let on_disk = std::fs::read(dir.path().join("a.xlsx")).unwrap();
    let outcome = engine
        .process(&ItemParams::new(Operation::ReadFile).file_path("a.xlsx"))
        .unwrap();
    assert_eq!(outcome.attachment.unwrap().data, on_disk);

    let outcome = engine
        .process(&ItemParams::new(Operation::DeleteFile).file_path("a.xlsx"))
        .unwrap();
    assert!(outcome.success);
    assert!(!dir.path().join("a.xlsx").exists());
}

#[test]
fn test_xlsx_datetime_cells_survive_edit() {
    let dir = tempdir().unwrap();
    let mut engine = engine(dir.path());
    let when = NaiveDate::from_ymd_opt(2024, 5, 17)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();

    let mut book = sheetman_sheet::Book::new();
    book.add_sheet(
        "Log",
        sheetman_sheet::Sheet::from_data(vec![
            vec![CellValue::from("Id"), CellValue::from("At"), CellValue::from("Note")],
            vec![CellValue::Int(1), CellValue::DateTime(when), CellValue::Empty],
        ]),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("log.xlsx"),
        XlsxCodec::new().encode(&book).unwrap(),
    )
    .unwrap();

    let params = ItemParams::new(Operation::Edit)
        .file_path("log.xlsx")
        .condition("Id", json!(1))
        .update("Note", json!("done"));
    assert!(engine.process(&params).unwrap().success);

    let bytes = std::fs::read(dir.path().join("log.xlsx")).unwrap();
    let book = XlsxCodec::new().decode(&bytes).unwrap();
    let sheet = book.get_sheet("Log").unwrap();
    assert_eq!(sheet.get(1, 1), &CellValue::DateTime(when));
    assert_eq!(sheet.get(1, 2), &CellValue::from("done"));
}
