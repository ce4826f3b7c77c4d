// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 计数仓储、故障缓存与 API 装配
// ==========================================

use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use student_roster::cache::{CacheError, CacheResult, CacheService, MemoryCacheService};
use student_roster::db::init_schema;
use student_roster::query::StudentQuery;
use student_roster::repository::{RepositoryResult, SqliteStudentRepository, StudentRepository};
use student_roster::{HealthApi, PagedResult, PaginationParameters, Student, StudentApi};

// ==========================================
// CountingRepository - 记录存储访问次数
// ==========================================

pub struct CountingRepository {
    inner: SqliteStudentRepository,
    count_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new(inner: SqliteStudentRepository) -> Self {
        Self {
            inner,
            count_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StudentRepository for CountingRepository {
    async fn import(&self, students: Vec<Student>) -> RepositoryResult<usize> {
        self.inner.import(students).await
    }

    async fn add(&self, student: Student) -> RepositoryResult<()> {
        self.inner.add(student).await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Student>> {
        self.inner.get_by_id(id).await
    }

    async fn get_all(
        &self,
        pagination: PaginationParameters,
    ) -> RepositoryResult<PagedResult<Student>> {
        self.inner.get_all(pagination).await
    }

    async fn count(&self, query: &StudentQuery) -> RepositoryResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.count(query).await
    }

    async fn fetch_page(&self, query: &StudentQuery) -> RepositoryResult<Vec<Student>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_page(query).await
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.inner.ping().await
    }
}

// ==========================================
// FailingCache - 所有操作均失败
// ==========================================

pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn remove(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

// ==========================================
// 装配
// ==========================================

pub struct TestEnv {
    pub conn: Arc<Mutex<Connection>>,
    pub repo: Arc<CountingRepository>,
    pub cache: Arc<MemoryCacheService>,
    pub api: StudentApi<CountingRepository, MemoryCacheService>,
}

/// 内存库 + 计数仓储 + 默认缓存
pub fn setup_env() -> TestEnv {
    setup_env_with_ttl(Duration::from_secs(60))
}

pub fn setup_env_with_ttl(ttl: Duration) -> TestEnv {
    student_roster::logging::init_test();

    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));

    let repo = Arc::new(CountingRepository::new(SqliteStudentRepository::from_connection(
        conn.clone(),
    )));
    let cache = Arc::new(MemoryCacheService::new("StudentApi", ttl));
    let api = StudentApi::with_default_extensions(repo.clone(), cache.clone());

    TestEnv {
        conn,
        repo,
        cache,
        api,
    }
}

/// 与故障缓存装配的 API
pub fn setup_failing_cache_api() -> StudentApi<SqliteStudentRepository, FailingCache> {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let repo = Arc::new(SqliteStudentRepository::from_connection(Arc::new(Mutex::new(conn))));
    StudentApi::with_default_extensions(repo, Arc::new(FailingCache))
}

/// 与故障缓存装配的健康检查
pub fn setup_failing_cache_health() -> HealthApi<SqliteStudentRepository, FailingCache> {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let repo = Arc::new(SqliteStudentRepository::from_connection(Arc::new(Mutex::new(conn))));
    HealthApi::new(repo, Arc::new(FailingCache))
}
