// ==========================================
// 学生花名册服务 - 缓存层
// ==========================================
// 职责: 查询结果缓存（字符串值 + 滑动过期）
// ==========================================

pub mod cache_service;

pub use cache_service::{get_json, set_json, CacheService, MemoryCacheService};

use thiserror::Error;

/// 缓存层错误类型
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("缓存锁获取失败: {0}")]
    LockError(String),

    #[error("缓存序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("缓存不可用: {0}")]
    Unavailable(String),
}

/// Result 类型别名
pub type CacheResult<T> = Result<T, CacheError>;
