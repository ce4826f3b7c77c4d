// ==========================================
// 学生花名册服务 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将下层错误归类为对外状态码
// ==========================================

use crate::api::service_result::StatusCode;
use crate::cache::CacheError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 客户端错误
    // ==========================================
    #[error("不支持的文件类型: {0}")]
    UnsupportedFileType(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("操作已取消")]
    Cancelled,

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("缓存错误: {0}")]
    CacheError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对外状态码分类
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedFileType(_) => StatusCode::BadRequest,
            ApiError::NotFound(_) => StatusCode::NotFound,
            ApiError::Cancelled => StatusCode::ClientClosedRequest,
            _ => StatusCode::InternalServerError,
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 写入失败一律归为内部错误（整批失败，不声明部分成功）
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::ValidationError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::ValidationError(format!("检查约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::ValidationError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::CorruptRow { column, message } => {
                ApiError::DatabaseError(format!("第{}列数据损坏: {}", column, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        ApiError::CacheError(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Cancelled => ApiError::Cancelled,
            ImportError::UnsupportedFormat(ext) => ApiError::UnsupportedFileType(ext),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
