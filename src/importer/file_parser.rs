// ==========================================
// 学生花名册服务 - 文件解析器实现
// ==========================================
// 职责: 上传文件内容 → 原始行（单元格文本）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 规则:
// - 只读第一个工作表
// - 单元格文本去除首尾空白
// - 完全空白的行直接丢弃，行号保留原始位置
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;

/// UTF-8 BOM
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// ==========================================
// RawRow - 原始行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 在文件中的行号（从 1 开始）
    pub line: usize,
    pub cells: Vec<String>,
    /// 无法按 UTF-8 解码的单元格位置（文本为有损解码结果）
    pub undecodable: Vec<usize>,
}

impl RawRow {
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件内容为原始行（不含完全空白的行）
    fn parse_rows(&self, content: &[u8]) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_rows(&self, content: &[u8]) -> ImportResult<Vec<RawRow>> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(content);

        // 按字节读取：编码错误只影响所在单元格，不影响整个文件
        let mut rows = Vec::new();
        for (idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);

            let mut undecodable = Vec::new();
            let cells = record
                .iter()
                .enumerate()
                .map(|(col, bytes)| match std::str::from_utf8(bytes) {
                    Ok(text) => text.trim().to_string(),
                    Err(_) => {
                        undecodable.push(col);
                        String::from_utf8_lossy(bytes).trim().to_string()
                    }
                })
                .collect();

            let row = RawRow {
                line,
                cells,
                undecodable,
            };

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_rows(&self, content: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))?;

        // 读取第一个 sheet
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))??;

        // 已用区域的左上角（空表为 None）
        let Some((start_row, _)) = range.start() else {
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        for (idx, data_row) in range.rows().enumerate() {
            let row = RawRow {
                line: start_row as usize + idx + 1,
                cells: data_row.iter().map(cell_to_text).collect(),
                undecodable: Vec::new(),
            };

            if row.is_blank() {
                continue;
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

/// 单元格 → 文本
///
/// 日期单元格按 `%Y-%m-%d %H:%M:%S` 输出，整数值浮点按整数输出
fn cell_to_text(cell: &Data) -> String {
    let text = match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    };
    text.trim().to_string()
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// # 参数
    /// - extension: 带前导点的小写扩展名（如 ".xlsx"）
    /// - content: 文件内容
    pub fn parse(&self, extension: &str, content: &[u8]) -> ImportResult<Vec<RawRow>> {
        match extension {
            ".csv" => CsvParser.parse_rows(content),
            ".xlsx" | ".xls" | ".xlsm" | ".xlsb" | ".ods" => ExcelParser.parse_rows(content),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_parser_keeps_line_numbers() {
        let content = "First Name,Roll\nAda,7\n,\nGrace,8\n";
        let rows = CsvParser.parse_rows(content.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells, vec!["First Name", "Roll"]);
        assert_eq!(rows[1].line, 2);
        // 第 3 行为空白行被丢弃
        assert_eq!(rows[2].line, 4);
        assert_eq!(rows[2].cells, vec!["Grace", "8"]);
    }

    #[test]
    fn test_csv_parser_trims_and_strips_bom() {
        let mut content = UTF8_BOM.to_vec();
        content.extend_from_slice(b"  First Name , Roll\n Ada ,7\n");

        let rows = CsvParser.parse_rows(&content).unwrap();
        assert_eq!(rows[0].cells, vec!["First Name", "Roll"]);
        assert_eq!(rows[1].cells, vec!["Ada", "7"]);
    }

    #[test]
    fn test_csv_parser_flexible_lengths() {
        let rows = CsvParser
            .parse_rows(b"a,b,c\n1\n1,2,3,4\n")
            .unwrap();
        assert_eq!(rows[1].cells.len(), 1);
        assert_eq!(rows[2].cells.len(), 4);
    }

    #[test]
    fn test_csv_parser_isolates_invalid_utf8_cells() {
        let content = b"First Name,Roll\nAda,7\n\xff\xfe,8\nGrace,9\n";
        let rows = CsvParser.parse_rows(content).unwrap();

        assert_eq!(rows.len(), 4);
        assert!(rows[1].undecodable.is_empty());
        assert_eq!(rows[2].line, 3);
        assert_eq!(rows[2].undecodable, vec![0]);
        assert_eq!(rows[2].cells[1], "8");
        assert_eq!(rows[3].cells, vec!["Grace", "9"]);
    }

    #[test]
    fn test_excel_parser_rejects_garbage() {
        let result = ExcelParser.parse_rows(b"definitely not a workbook");
        assert!(result.is_err());
    }

    #[test]
    fn test_universal_parser_unknown_extension() {
        let result = UniversalFileParser.parse(".pdf", b"%PDF");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(cell_to_text(&Data::Empty), "");
        assert_eq!(cell_to_text(&Data::String("  Ada ".to_string())), "Ada");
        assert_eq!(cell_to_text(&Data::Float(7.0)), "7");
        assert_eq!(cell_to_text(&Data::Int(42)), "42");
        assert_eq!(cell_to_text(&Data::Bool(true)), "true");
    }
}
