// ==========================================
// 学生花名册服务 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine/csv
// 系统定位: 表格批量导入 + 可搜索/排序/分页的缓存查询
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 表格抽取/映射引擎
pub mod importer;

// 查询层 - 过滤/排序/分页组合
pub mod query;

// 缓存层 - 查询结果缓存
pub mod cache;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Gender, MaritalStatus, SortDirection, StudentSortField};

// 领域实体
pub use domain::{
    ExcelStudentRow, PagedResult, PaginationParameters, Student, StudentDto,
    StudentQueryParameters,
};

// 导入引擎
pub use importer::{FilePayload, RowError, SpreadsheetExtractor};

// API
pub use api::{HealthApi, ServiceResult, StatusCode, StudentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学生花名册服务";
