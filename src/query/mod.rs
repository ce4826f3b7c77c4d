// ==========================================
// 学生花名册服务 - 查询层
// ==========================================
// 职责: 搜索/排序/分页 → SQL
// ==========================================

pub mod sql_builder;
pub mod student_query;

pub use sql_builder::SqlQueryBuilder;
pub use student_query::{search_key, StudentQuery, STUDENT_COLUMNS};
