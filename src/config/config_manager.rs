// ==========================================
// 学生花名册服务 - 配置管理器
// ==========================================
// 职责: 配置查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 未配置或格式错误时回落到 constants 中的默认值
// ==========================================

use crate::config::constants::{
    CACHE_INSTANCE_NAME, CACHE_SLIDING_TTL_SECS, VALID_FILE_EXTENSIONS,
};
use crate::i18n::Locale;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取全部 global 配置
    pub fn get_all_global(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }

    // ===== 缓存配置 =====

    /// 缓存滑动过期时间（默认 60 秒，非正数/非法值回落到默认）
    pub fn get_cache_sliding_ttl(&self) -> Result<Duration, Box<dyn Error>> {
        let default = CACHE_SLIDING_TTL_SECS.to_string();
        let value = self.get_config_or_default(config_keys::CACHE_SLIDING_TTL_SECS, &default)?;

        let secs = match value.trim().parse::<u64>() {
            Ok(v) if v > 0 => v,
            _ => {
                tracing::warn!(
                    config_key = config_keys::CACHE_SLIDING_TTL_SECS,
                    raw_value = %value,
                    "缓存过期时间配置格式错误，使用默认值"
                );
                CACHE_SLIDING_TTL_SECS
            }
        };
        Ok(Duration::from_secs(secs))
    }

    /// 缓存实例名（键前缀）
    pub fn get_cache_instance_name(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::CACHE_INSTANCE_NAME, CACHE_INSTANCE_NAME)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(CACHE_INSTANCE_NAME.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    // ===== 导入配置 =====

    /// 允许的文件扩展名（逗号分隔，统一为小写并带前导点）
    pub fn get_allowed_extensions(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::IMPORT_ALLOWED_EXTENSIONS,
            &VALID_FILE_EXTENSIONS.join(","),
        )?;

        let extensions: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| if s.starts_with('.') { s } else { format!(".{}", s) })
            .collect();

        if extensions.is_empty() {
            Ok(VALID_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect())
        } else {
            Ok(extensions)
        }
    }

    // ===== 本地化 =====

    /// 响应消息语言（未配置或不支持时为英文）
    pub fn get_locale(&self) -> Result<Locale, Box<dyn Error>> {
        let Some(value) = self.get_global_config_value(config_keys::APP_LOCALE)? else {
            return Ok(Locale::default());
        };

        match Locale::parse(&value) {
            Some(locale) => Ok(locale),
            None => {
                tracing::warn!(
                    config_key = config_keys::APP_LOCALE,
                    raw_value = %value,
                    "不支持的语言配置，使用默认值"
                );
                Ok(Locale::default())
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 缓存
    pub const CACHE_SLIDING_TTL_SECS: &str = "cache.sliding_ttl_secs";
    pub const CACHE_INSTANCE_NAME: &str = "cache.instance_name";

    // 导入
    pub const IMPORT_ALLOWED_EXTENSIONS: &str = "import.allowed_extensions";

    // 本地化
    pub const APP_LOCALE: &str = "app.locale";
}
