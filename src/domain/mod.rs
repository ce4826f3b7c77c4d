// ==========================================
// 学生花名册服务 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、查询参数与分页结果
// 红线: 不含数据访问逻辑,不含导入/缓存逻辑
// ==========================================

pub mod paged;
pub mod student;
pub mod types;

// 重导出核心类型
pub use paged::{PagedResult, PaginationParameters, StudentQueryParameters};
pub use student::{ExcelStudentRow, Student, StudentDto};
pub use types::{Gender, MaritalStatus, SheetEnum, SortDirection, StudentSortField};
