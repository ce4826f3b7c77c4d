// ==========================================
// 学生花名册服务 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 单元格类型转换错误
///
/// 由类型转换单元以返回值形式给出，行转换器负责收集，不会中断整行
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("无法将 '{input}' 解析为枚举 '{enum_name}'")]
    InvalidEnum { input: String, enum_name: String },

    #[error("'{input}' 不是有效的{type_name}")]
    InvalidValue { input: String, type_name: String },

    #[error("字段 {field} 期望{expected}类型的值")]
    TypeMismatch { field: String, expected: String },
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 流程控制 =====
    #[error("导入已取消")]
    Cancelled,

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 单元格转换 Result 类型别名
pub type CoercionResult<T> = Result<T, CoercionError>;
