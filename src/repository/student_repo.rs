// ==========================================
// 学生花名册服务 - 学生数据仓储
// ==========================================
// 职责: 管理 student 表的写入与查询
// 红线: Repository 不含业务逻辑，只负责数据访问
// 存储约定:
// - id 为带连字符的 UUID 文本
// - salary 为十进制文本（不丢精度）
// - 时间为 RFC3339（UTC，微秒，固定宽度，可直接按文本排序）
// ==========================================

use crate::config::constants::{
    MAX_EDUCATION_LENGTH, MAX_EMAIL_LENGTH, MAX_FIRST_NAME_LENGTH, MAX_LAST_NAME_LENGTH,
    MAX_OCCUPATION_LENGTH, MAX_PHONE_LENGTH,
};
use crate::domain::types::{Gender, MaritalStatus, SheetEnum};
use crate::domain::{PagedResult, PaginationParameters, Student};
use crate::query::{search_key, StudentQuery, STUDENT_COLUMNS};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

// ==========================================
// StudentRepository Trait
// ==========================================
// 实现者: SqliteStudentRepository（使用 rusqlite）
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// 批量导入（单事务，全部成功或全部回滚）
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    async fn import(&self, students: Vec<Student>) -> RepositoryResult<usize>;

    /// 新增单条记录
    async fn add(&self, student: Student) -> RepositoryResult<()>;

    /// 按 id 查询
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Student>>;

    /// 最近更新的记录（按 last_updated 倒序分页）
    async fn get_all(&self, pagination: PaginationParameters)
        -> RepositoryResult<PagedResult<Student>>;

    /// 过滤后的总数（分页前）
    async fn count(&self, query: &StudentQuery) -> RepositoryResult<u64>;

    /// 过滤 + 排序 + 分页后的当前页
    async fn fetch_page(&self, query: &StudentQuery) -> RepositoryResult<Vec<Student>>;

    /// 连通性检查
    async fn ping(&self) -> RepositoryResult<()>;
}

// ==========================================
// SqliteStudentRepository
// ==========================================
pub struct SqliteStudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStudentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn insert(tx: &Transaction<'_>, student: &Student) -> RepositoryResult<()> {
        validate_lengths(student)?;

        tx.execute(
            &format!(
                "INSERT INTO student ({}, first_name_key, last_name_key) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                STUDENT_COLUMNS
            ),
            params![
                student.id.to_string(),
                student.first_name,
                student.last_name,
                student.roll,
                student.age,
                student.phone_number,
                student.email_address,
                student.gender.symbol(),
                student.education,
                student.occupation,
                student.experience,
                student.salary.to_string(),
                student.marital_status.symbol(),
                student.number_of_children,
                format_timestamp(&student.created_at),
                format_timestamp(&student.last_updated),
                search_key(&student.first_name),
                search_key(&student.last_name),
            ],
        )?;
        Ok(())
    }

    fn query_students(
        conn: &Connection,
        sql: &str,
        binds: &[String],
    ) -> RepositoryResult<Vec<Student>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(binds.iter()), map_student_row)?;

        let mut students = Vec::new();
        for row in rows {
            students.push(row?);
        }
        Ok(students)
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn import(&self, students: Vec<Student>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        for student in &students {
            Self::insert(&tx, student)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(students.len())
    }

    async fn add(&self, student: Student) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        Self::insert(&tx, &student)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                &format!("SELECT {} FROM student WHERE id = ?1", STUDENT_COLUMNS),
                params![id.to_string()],
                map_student_row,
            )
            .optional()?;
        Ok(student)
    }

    async fn get_all(
        &self,
        pagination: PaginationParameters,
    ) -> RepositoryResult<PagedResult<Student>> {
        let conn = self.get_conn()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM student", [], |row| row.get(0))?;
        let sql = format!(
            "SELECT {} FROM student ORDER BY last_updated DESC, id ASC LIMIT ?1 OFFSET ?2",
            STUDENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![pagination.page_size(), pagination.offset() as i64],
            map_student_row,
        )?;

        let mut students = Vec::new();
        for row in rows {
            students.push(row?);
        }

        Ok(PagedResult::new(
            students,
            total.max(0) as u64,
            pagination.page_number(),
            pagination.page_size(),
        ))
    }

    async fn count(&self, query: &StudentQuery) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let total: i64 = conn.query_row(
            &query.count_sql(),
            params_from_iter(query.bind_values().iter()),
            |row| row.get(0),
        )?;
        Ok(total.max(0) as u64)
    }

    async fn fetch_page(&self, query: &StudentQuery) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        Self::query_students(&conn, &query.page_sql(), &query.bind_values())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(())
    }
}

// ==========================================
// 行映射与校验
// ==========================================

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn get_parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|e| conversion_error(idx, e))
}

fn get_symbol<E: SheetEnum>(row: &Row<'_>, idx: usize) -> rusqlite::Result<E> {
    let text: String = row.get(idx)?;
    E::from_symbol(&text).ok_or_else(|| {
        conversion_error(
            idx,
            RepositoryError::CorruptRow {
                column: idx.to_string(),
                message: format!("未知的 {} 值: {}", E::TYPE_NAME, text),
            },
        )
    })
}

fn get_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

/// 行 → Student（列顺序与 STUDENT_COLUMNS 一致）
fn map_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: get_parsed::<Uuid>(row, 0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        roll: row.get(3)?,
        age: row.get(4)?,
        phone_number: row.get(5)?,
        email_address: row.get(6)?,
        gender: get_symbol::<Gender>(row, 7)?,
        education: row.get(8)?,
        occupation: row.get(9)?,
        experience: row.get(10)?,
        salary: get_parsed::<Decimal>(row, 11)?,
        marital_status: get_symbol::<MaritalStatus>(row, 12)?,
        number_of_children: row.get(13)?,
        created_at: get_timestamp(row, 14)?,
        last_updated: get_timestamp(row, 15)?,
    })
}

/// 写入前校验文本长度（与表约束一致）
fn validate_lengths(student: &Student) -> RepositoryResult<()> {
    let checks: [(&str, &str, usize); 6] = [
        ("first_name", student.first_name.as_str(), MAX_FIRST_NAME_LENGTH),
        ("last_name", student.last_name.as_str(), MAX_LAST_NAME_LENGTH),
        ("phone_number", student.phone_number.as_str(), MAX_PHONE_LENGTH),
        ("email_address", student.email_address.as_str(), MAX_EMAIL_LENGTH),
        ("education", student.education.as_str(), MAX_EDUCATION_LENGTH),
        ("occupation", student.occupation.as_str(), MAX_OCCUPATION_LENGTH),
    ];

    for (field, value, max) in checks {
        let len = value.chars().count();
        if len > max {
            return Err(RepositoryError::FieldValueError {
                field: field.to_string(),
                message: format!("长度 {} 超过上限 {} (id={})", len, max, student.id),
            });
        }
    }
    Ok(())
}
