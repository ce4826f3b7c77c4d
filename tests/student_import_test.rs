// ==========================================
// 学生导入集成测试
// ==========================================
// 测试范围:
// 1. 合格行落库、错误行按单元格上报
// 2. 空白单元格保持零值
// 3. 扩展名白名单、空文件、取消
// 4. 表头大小写/顺序/缺列
// ==========================================

mod helpers;
mod test_helpers;

use helpers::api_test_helper::*;
use helpers::test_data_builder::SheetRowBuilder;
use rust_decimal::Decimal;
use std::io::Write;
use student_roster::app::AppState;
use student_roster::{FilePayload, StatusCode, StudentQueryParameters};
use test_helpers::{create_test_db, csv_payload};
use tokio_util::sync::CancellationToken;

fn ada_row() -> Vec<String> {
    vec![
        "Ada", "Lovelace", "1", "36", "01711111111", "ada@example.com", "Female", "MSc",
        "Mathematician", "10", "5000.75", "Married", "2",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[tokio::test]
async fn test_import_accepts_valid_row() {
    let env = setup_env();
    let token = CancellationToken::new();

    let result = env
        .api
        .import_students(csv_payload("students.csv", &[ada_row()]), &token)
        .await;

    assert_eq!(result.status_code, StatusCode::Created);
    let summary = result.data.unwrap();
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.rejected_rows, 0);
    assert!(summary.row_errors.is_empty());

    let page = env
        .api
        .get_students(&StudentQueryParameters::new(), &token)
        .await
        .data
        .unwrap();
    assert_eq!(page.total_count(), 1);

    let ada = &page.items()[0];
    assert_eq!(ada.first_name, "Ada");
    assert_eq!(ada.last_name, "Lovelace");
    assert_eq!(ada.roll, 1);
    assert_eq!(ada.age, 36);
    assert_eq!(ada.gender, "Female");
    assert_eq!(ada.marital_status, "Married");
    assert_eq!(ada.salary, Decimal::new(500075, 2));
    assert_eq!(ada.number_of_children, 2);
}

#[tokio::test]
async fn test_import_rejects_unparseable_roll() {
    let env = setup_env();
    let token = CancellationToken::new();

    let rows = vec![
        SheetRowBuilder::new("Alan", "Turing", "seven").build(),
        SheetRowBuilder::new("Grace", "Hopper", "3").build(),
    ];
    let result = env
        .api
        .import_students(csv_payload("students.csv", &rows), &token)
        .await;

    assert_eq!(result.status_code, StatusCode::Created);
    let summary = result.data.unwrap();
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.rejected_rows, 1);
    assert_eq!(summary.row_errors.len(), 1);

    // 表头为第 1 行
    let error = &summary.row_errors[0];
    assert_eq!(error.row_number, 2);
    assert!(error.message.contains("Roll"), "message: {}", error.message);
    assert!(error.message.contains("seven"), "message: {}", error.message);

    let page = env
        .api
        .get_students(&StudentQueryParameters::new(), &token)
        .await
        .data
        .unwrap();
    assert_eq!(page.total_count(), 1);
    assert_eq!(page.items()[0].first_name, "Grace");
}

#[tokio::test]
async fn test_import_reports_every_bad_cell_of_a_row() {
    let env = setup_env();
    let token = CancellationToken::new();

    let rows = vec![SheetRowBuilder::new("Bad", "Row", "x")
        .age("old")
        .gender("Unknown")
        .marital_status("2")
        .build()];
    let summary = env
        .api
        .import_students(csv_payload("students.csv", &rows), &token)
        .await
        .data
        .unwrap();

    assert_eq!(summary.imported, 0);
    assert_eq!(summary.rejected_rows, 1);
    assert_eq!(summary.row_errors.len(), 4);
    assert!(summary.row_errors.iter().all(|e| e.row_number == 2));
    assert!(summary
        .row_errors
        .iter()
        .any(|e| e.message.contains("Gender")));
}

#[tokio::test]
async fn test_blank_cells_keep_zero_values() {
    let env = setup_env();
    let token = CancellationToken::new();

    // Age, Gender, Salary, Marital Status 留空
    let rows = vec![SheetRowBuilder::new("Blank", "Cells", "9")
        .blank(3)
        .blank(6)
        .blank(10)
        .blank(11)
        .build()];
    let summary = env
        .api
        .import_students(csv_payload("students.csv", &rows), &token)
        .await
        .data
        .unwrap();
    assert_eq!(summary.imported, 1);

    let page = env
        .api
        .get_students(&StudentQueryParameters::new(), &token)
        .await
        .data
        .unwrap();
    let student = &page.items()[0];
    assert_eq!(student.age, 0);
    assert_eq!(student.gender, "Male");
    assert_eq!(student.salary, Decimal::ZERO);
    assert_eq!(student.marital_status, "Single");
}

#[tokio::test]
async fn test_fully_blank_rows_are_skipped() {
    let env = setup_env();
    let token = CancellationToken::new();

    let blank = vec![String::new(); 13];
    let rows = vec![ada_row(), blank, SheetRowBuilder::new("Grace", "Hopper", "seven").build()];
    let summary = env
        .api
        .import_students(csv_payload("students.csv", &rows), &token)
        .await
        .data
        .unwrap();

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.rejected_rows, 1);
    // 行号取物理行号，空行也占位
    assert_eq!(summary.row_errors[0].row_number, 4);
}

#[tokio::test]
async fn test_header_matching_ignores_case_order_and_missing_columns() {
    let env = setup_env();
    let token = CancellationToken::new();

    let content = "roll, FIRST NAME ,Last Name,Unrelated\n42,Linus,Torvalds,whatever\n";
    let payload = FilePayload::new("students.CSV", content.as_bytes().to_vec());
    let summary = env
        .api
        .import_students(payload, &token)
        .await
        .data
        .unwrap();
    assert_eq!(summary.imported, 1);

    let page = env
        .api
        .get_students(&StudentQueryParameters::new(), &token)
        .await
        .data
        .unwrap();
    let student = &page.items()[0];
    assert_eq!(student.first_name, "Linus");
    assert_eq!(student.last_name, "Torvalds");
    assert_eq!(student.roll, 42);
    assert_eq!(student.email_address, "");
}

#[tokio::test]
async fn test_unsupported_extension_is_bad_request() {
    let env = setup_env();
    let token = CancellationToken::new();

    let payload = FilePayload::new("students.txt", b"First Name\nAda\n".to_vec());
    let result = env.api.import_students(payload, &token).await;

    assert_eq!(result.status_code, StatusCode::BadRequest);
    assert!(result.data.is_none());
    assert!(result.message.contains(".txt"));

    let payload = FilePayload::new("students", b"First Name\nAda\n".to_vec());
    let result = env.api.import_students(payload, &token).await;
    assert_eq!(result.status_code, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_empty_file_imports_nothing() {
    let env = setup_env();
    let token = CancellationToken::new();

    let result = env
        .api
        .import_students(FilePayload::new("students.xlsx", Vec::new()), &token)
        .await;

    assert_eq!(result.status_code, StatusCode::Created);
    assert_eq!(result.data.unwrap().imported, 0);
}

#[tokio::test]
async fn test_cancelled_import_writes_nothing() {
    let env = setup_env();
    let token = CancellationToken::new();
    token.cancel();

    let result = env
        .api
        .import_students(csv_payload("students.csv", &[ada_row()]), &token)
        .await;
    assert_eq!(result.status_code, StatusCode::ClientClosedRequest);

    let fresh = CancellationToken::new();
    let page = env
        .api
        .get_students(&StudentQueryParameters::new(), &fresh)
        .await
        .data
        .unwrap();
    assert_eq!(page.total_count(), 0);
}

#[tokio::test]
async fn test_import_from_file_through_app_state() {
    let (_temp_db, db_path) = create_test_db().expect("创建测试数据库失败");
    let state = AppState::new(db_path).expect("初始化AppState失败");

    let mut sheet = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    sheet
        .write_all(test_helpers::student_csv(&[ada_row()]).as_bytes())
        .unwrap();
    sheet.flush().unwrap();

    let payload = FilePayload::from_path(sheet.path()).unwrap();
    let token = CancellationToken::new();
    let result = state.student_api.import_students(payload, &token).await;

    assert_eq!(result.status_code, StatusCode::Created);
    assert_eq!(result.data.unwrap().imported, 1);
}
