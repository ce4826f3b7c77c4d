// ==========================================
// 学生花名册服务 - 导入层
// ==========================================
// 职责: 上传的表格 → 强类型记录列表
// 支持: Excel (.xlsx/.xls), CSV
// 单行错误不会中断整批导入
// ==========================================

// 模块声明
pub mod coercion;
pub mod error;
pub mod extractor;
pub mod file_parser;
pub mod header_map;
pub mod row_converter;
pub mod student_sheet;

// 重导出核心类型
pub use coercion::{coerce, CellValue, EnumSpec, ValueType};
pub use error::{CoercionError, CoercionResult, ImportError, ImportResult};
pub use extractor::{FilePayload, SpreadsheetExtractor};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use header_map::{FieldDescriptor, HeaderMap};
pub use row_converter::{convert_row, RowConversion, RowError, SheetRecord};
pub use student_sheet::{student_sheet_headers, StudentColumn};
