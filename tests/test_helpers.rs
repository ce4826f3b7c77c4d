// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、表格内容生成等功能
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use student_roster::db::{init_schema, open_sqlite_connection};
use student_roster::importer::student_sheet_headers;
use rust_xlsxwriter::Workbook;
use student_roster::FilePayload;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是有效 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 生成学生表格 CSV 文本（第一行为标准表头）
pub fn student_csv(rows: &[Vec<String>]) -> String {
    let mut out = student_sheet_headers().join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// 生成 CSV 文件载荷
pub fn csv_payload(file_name: &str, rows: &[Vec<String>]) -> FilePayload {
    FilePayload::new(file_name, student_csv(rows).into_bytes())
}

// ==========================================
// xlsx 载荷
// ==========================================

/// xlsx 单元格
#[derive(Debug, Clone)]
pub enum XlsxCell {
    Text(String),
    Number(f64),
    Blank,
}

impl From<&str> for XlsxCell {
    fn from(text: &str) -> Self {
        XlsxCell::Text(text.to_string())
    }
}

impl From<f64> for XlsxCell {
    fn from(value: f64) -> Self {
        XlsxCell::Number(value)
    }
}

/// 生成 xlsx 文件载荷
///
/// # 参数
/// - header_row: 表头所在行（从 0 开始），其上方的行留空
/// - rows: 数据行，空 Vec 表示整行空白
pub fn xlsx_payload(
    file_name: &str,
    header_row: u32,
    rows: &[Vec<XlsxCell>],
) -> Result<FilePayload, Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in student_sheet_headers().iter().enumerate() {
        sheet.write_string(header_row, col as u16, *header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let line = header_row + 1 + idx as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                XlsxCell::Text(text) => {
                    sheet.write_string(line, col as u16, text.as_str())?;
                }
                XlsxCell::Number(value) => {
                    sheet.write_number(line, col as u16, *value)?;
                }
                XlsxCell::Blank => {}
            }
        }
    }

    Ok(FilePayload::new(file_name, workbook.save_to_buffer()?))
}
