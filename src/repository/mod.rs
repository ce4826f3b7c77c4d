// ==========================================
// 学生花名册服务 - 数据仓储层
// ==========================================
// 职责: 数据访问（SQLite）
// 红线: 不含业务逻辑
// ==========================================

pub mod error;
pub mod student_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use student_repo::{SqliteStudentRepository, StudentRepository};
