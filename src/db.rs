// ==========================================
// 学生花名册服务 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 幂等建表（schema_version / config_scope / config_kv / student）
// ==========================================

use crate::config::constants::{
    MAX_EDUCATION_LENGTH, MAX_EMAIL_LENGTH, MAX_FIRST_NAME_LENGTH, MAX_LAST_NAME_LENGTH,
    MAX_OCCUPATION_LENGTH, MAX_PHONE_LENGTH,
};
use crate::query::search_key;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（可重复执行）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    // 长度上限与 config::constants 保持一致
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS student (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL CHECK (length(first_name) <= {first}),
            last_name TEXT NOT NULL CHECK (length(last_name) <= {last}),
            roll INTEGER NOT NULL,
            age INTEGER NOT NULL,
            phone_number TEXT NOT NULL CHECK (length(phone_number) <= {phone}),
            email_address TEXT NOT NULL CHECK (length(email_address) <= {email}),
            gender TEXT NOT NULL,
            education TEXT NOT NULL CHECK (length(education) <= {education}),
            occupation TEXT NOT NULL CHECK (length(occupation) <= {occupation}),
            experience INTEGER NOT NULL,
            salary TEXT NOT NULL,
            marital_status TEXT NOT NULL,
            number_of_children INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            last_updated TEXT NOT NULL,
            first_name_key TEXT NOT NULL DEFAULT '',
            last_name_key TEXT NOT NULL DEFAULT ''
        );
        CREATE INDEX IF NOT EXISTS idx_student_last_updated ON student(last_updated);
        "#,
        first = MAX_FIRST_NAME_LENGTH,
        last = MAX_LAST_NAME_LENGTH,
        phone = MAX_PHONE_LENGTH,
        email = MAX_EMAIL_LENGTH,
        education = MAX_EDUCATION_LENGTH,
        occupation = MAX_OCCUPATION_LENGTH,
    ))?;

    ensure_name_key_columns(conn)?;
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_student_name_key ON student(first_name_key, last_name_key);",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

// ==========================================
// v1 → v2: 名/姓小写键列
// ==========================================
// v1 的 student 表没有键列；补列后按 Rust 侧折叠规则回填
fn ensure_name_key_columns(conn: &Connection) -> rusqlite::Result<()> {
    let has_key: bool = conn
        .query_row(
            "SELECT 1 FROM pragma_table_info('student') WHERE name = 'first_name_key'",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if has_key {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        DROP INDEX IF EXISTS idx_student_name;
        ALTER TABLE student ADD COLUMN first_name_key TEXT NOT NULL DEFAULT '';
        ALTER TABLE student ADD COLUMN last_name_key TEXT NOT NULL DEFAULT '';
        "#,
    )?;

    let names: Vec<(String, String, String)> = {
        let mut stmt = conn.prepare("SELECT id, first_name, last_name FROM student")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        rows.collect::<rusqlite::Result<_>>()?
    };

    let mut update = conn
        .prepare("UPDATE student SET first_name_key = ?1, last_name_key = ?2 WHERE id = ?3")?;
    for (id, first, last) in &names {
        update.execute(rusqlite::params![search_key(first), search_key(last), id])?;
    }

    tracing::info!(backfilled = names.len(), "student 表已补充名/姓小写键列");
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_student_length_check() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let too_long_phone = "1".repeat(MAX_PHONE_LENGTH + 1);
        let result = conn.execute(
            "INSERT INTO student VALUES ('a', 'Ada', 'Lovelace', 7, 36, ?1, '', 'Female', '', '', 0, '0', 'Single', 0, '', '', 'ada', 'lovelace')",
            [too_long_phone],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_v1_student_table_gets_backfilled_name_keys() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE student (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                roll INTEGER NOT NULL,
                age INTEGER NOT NULL,
                phone_number TEXT NOT NULL,
                email_address TEXT NOT NULL,
                gender TEXT NOT NULL,
                education TEXT NOT NULL,
                occupation TEXT NOT NULL,
                experience INTEGER NOT NULL,
                salary TEXT NOT NULL,
                marital_status TEXT NOT NULL,
                number_of_children INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                last_updated TEXT NOT NULL
            );
            CREATE INDEX idx_student_name ON student(first_name, last_name);
            INSERT INTO student VALUES ('a', 'Élodie', 'Öztürk', 7, 21, '', '', 'Female', '', '', 0, '0', 'Single', 0, '', '');
            "#,
        )
        .unwrap();

        init_schema(&conn).unwrap();

        let keys: (String, String) = conn
            .query_row(
                "SELECT first_name_key, last_name_key FROM student WHERE id = 'a'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(keys, ("élodie".to_string(), "öztürk".to_string()));
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));

        // 再次初始化不重复补列
        init_schema(&conn).unwrap();
    }
}
