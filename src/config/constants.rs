// ==========================================
// 学生花名册服务 - 系统常量
// ==========================================

// ===== 导入 =====

/// 允许上传的文件扩展名（比较时大小写不敏感）
pub const VALID_FILE_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];

// ===== 缓存 =====

/// 查询结果缓存的滑动过期时间（秒）
pub const CACHE_SLIDING_TTL_SECS: u64 = 60;

/// 缓存实例名（键前缀）
pub const CACHE_INSTANCE_NAME: &str = "StudentApi";

// ===== 分页 =====

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

// ===== 字段长度上限（与 student 表 CHECK 约束一致）=====

pub const MAX_FIRST_NAME_LENGTH: usize = 50;
pub const MAX_LAST_NAME_LENGTH: usize = 50;
pub const MAX_PHONE_LENGTH: usize = 11;
pub const MAX_EMAIL_LENGTH: usize = 250;
pub const MAX_EDUCATION_LENGTH: usize = 50;
pub const MAX_OCCUPATION_LENGTH: usize = 50;
