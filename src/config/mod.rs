// ==========================================
// 学生花名册服务 - 配置层
// ==========================================
// 职责: 系统常量 + 可覆写配置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod constants;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
