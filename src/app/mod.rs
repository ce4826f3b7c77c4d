// ==========================================
// 学生花名册服务 - 应用层
// ==========================================
// 职责: 依赖装配，连接命令行入口与 API 层
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
