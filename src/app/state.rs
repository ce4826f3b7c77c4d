// ==========================================
// 学生花名册服务 - 应用状态
// ==========================================
// 职责: 装配共享连接、仓储、缓存与 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{HealthApi, StudentApi};
use crate::cache::MemoryCacheService;
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use crate::repository::SqliteStudentRepository;
use rusqlite::Connection;

/// 应用状态
///
/// 进程内唯一的依赖装配点；缓存与连接在各 API 之间共享
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接
    pub conn: Arc<Mutex<Connection>>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 学生仓储
    pub student_repo: Arc<SqliteStudentRepository>,

    /// 查询缓存
    pub cache: Arc<MemoryCacheService>,

    /// 学生API
    pub student_api: Arc<StudentApi>,

    /// 健康检查API
    pub health_api: Arc<HealthApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 为内存库）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        match read_schema_version(&conn) {
            Ok(version) => tracing::debug!(schema_version = ?version, "数据库 schema 已就绪"),
            Err(e) => tracing::warn!("读取 schema 版本失败(将继续启动): {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 读取配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法初始化配置管理器: {}", e))?,
        );
        let sliding_ttl = config_manager
            .get_cache_sliding_ttl()
            .map_err(|e| format!("读取缓存配置失败: {}", e))?;
        let instance_name = config_manager
            .get_cache_instance_name()
            .map_err(|e| format!("读取缓存配置失败: {}", e))?;
        let allowed_extensions = config_manager
            .get_allowed_extensions()
            .map_err(|e| format!("读取导入配置失败: {}", e))?;
        let locale = config_manager
            .get_locale()
            .map_err(|e| format!("读取语言配置失败: {}", e))?;
        locale.activate();

        tracing::debug!(
            sliding_ttl_secs = sliding_ttl.as_secs(),
            instance_name = %instance_name,
            allowed = ?allowed_extensions,
            locale = %locale,
            "配置加载完成"
        );

        // ==========================================
        // 装配
        // ==========================================
        let student_repo = Arc::new(SqliteStudentRepository::from_connection(conn.clone()));
        let cache = Arc::new(MemoryCacheService::new(instance_name, sliding_ttl));

        let student_api = Arc::new(StudentApi::new(
            student_repo.clone(),
            cache.clone(),
            allowed_extensions,
        ));
        let health_api = Arc::new(HealthApi::new(student_repo.clone(), cache.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conn,
            config_manager,
            student_repo,
            cache,
            student_api,
            health_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 STUDENT_ROSTER_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("STUDENT_ROSTER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./student_roster.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("student-roster");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("student_roster.db");
        }
    }

    path.to_string_lossy().to_string()
}
