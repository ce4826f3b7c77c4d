// ==========================================
// 学生花名册服务 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行入口调用
// 约定: 所有接口返回 ServiceResult，不向调用方抛错
// ==========================================

pub mod error;
pub mod health_api;
pub mod service_result;
pub mod student_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use health_api::{HealthApi, HealthReport};
pub use service_result::{ServiceResult, StatusCode};
pub use student_api::{ImportSummary, RejectedRow, StudentApi};
