// ==========================================
// 学生花名册服务 - 学生API
// ==========================================
// 职责:
// - 导入: 扩展名校验 → 抽取 → 批量落库
// - 查询: 缓存优先；未命中时组合查询、落缓存
// - 单条查询
// 错误: 全部转换为 ServiceResult（状态码 + 原因），不向调用方抛出
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::service_result::{ServiceResult, StatusCode};
use crate::cache::{set_json, CacheService, MemoryCacheService};
use crate::config::constants::VALID_FILE_EXTENSIONS;
use crate::domain::{
    ExcelStudentRow, PagedResult, PaginationParameters, Student, StudentDto,
    StudentQueryParameters,
};
use crate::i18n::{t, t_args};
use crate::importer::{FilePayload, SpreadsheetExtractor};
use crate::query::StudentQuery;
use crate::repository::{SqliteStudentRepository, StudentRepository};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 被拒绝的数据行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    pub row_number: usize,
    pub message: String,
}

/// 导入结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// 写入的记录数
    pub imported: usize,
    /// 被拒绝的行数
    pub rejected_rows: usize,
    /// 行错误明细（每个错误单元格一条）
    pub row_errors: Vec<RejectedRow>,
}

/// 与取消信号竞争执行
async fn cancellable<F, T, E>(token: &CancellationToken, fut: F) -> ApiResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<ApiError>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::Cancelled),
        res = fut => res.map_err(Into::into),
    }
}

/// 错误 → 结果（取消使用本地化消息）
fn failure<T>(err: ApiError) -> ServiceResult<T> {
    match err {
        ApiError::Cancelled => ServiceResult::status(StatusCode::ClientClosedRequest, t("common.cancelled")),
        other => ServiceResult::from_error(&other),
    }
}

// ==========================================
// StudentApi
// ==========================================
pub struct StudentApi<R = SqliteStudentRepository, C = MemoryCacheService> {
    repo: Arc<R>,
    cache: Arc<C>,
    extractor: SpreadsheetExtractor,
    allowed_extensions: Vec<String>,
}

impl<R, C> StudentApi<R, C>
where
    R: StudentRepository,
    C: CacheService,
{
    /// # 参数
    /// - repo: 学生仓储
    /// - cache: 查询缓存
    /// - allowed_extensions: 允许导入的扩展名（带前导点，大小写不敏感）
    pub fn new(repo: Arc<R>, cache: Arc<C>, allowed_extensions: Vec<String>) -> Self {
        Self {
            repo,
            cache,
            extractor: SpreadsheetExtractor::new(),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    /// 使用默认扩展名白名单
    pub fn with_default_extensions(repo: Arc<R>, cache: Arc<C>) -> Self {
        let allowed = VALID_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        Self::new(repo, cache, allowed)
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    fn is_allowed(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions.iter().any(|e| *e == extension)
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 导入学生表格
    ///
    /// # 返回
    /// - Created: 合格行已全部落库（可能伴随被拒绝的行）
    /// - BadRequest: 扩展名不在白名单
    /// - InternalServerError: 落库失败（整批回滚）
    #[instrument(skip(self, payload, token), fields(file_name = %payload.file_name))]
    pub async fn import_students(
        &self,
        payload: FilePayload,
        token: &CancellationToken,
    ) -> ServiceResult<ImportSummary> {
        let extension = payload.extension().unwrap_or_default();
        if !self.is_allowed(&extension) {
            warn!(extension = %extension, "文件类型不受支持");
            let allowed = self.allowed_extensions.join(", ");
            return ServiceResult::status(
                StatusCode::BadRequest,
                t_args(
                    "student.import_invalid_file_type",
                    &[("ext", extension.as_str()), ("allowed", allowed.as_str())],
                ),
            );
        }

        match self.try_import(&payload, token).await {
            Ok(summary) => ServiceResult::created(t("student.import_success"), summary),
            Err(err) => {
                error!(error = %err, "导入学生数据失败");
                failure(err)
            }
        }
    }

    async fn try_import(
        &self,
        payload: &FilePayload,
        token: &CancellationToken,
    ) -> ApiResult<ImportSummary> {
        info!("开始抽取学生数据");

        let mut row_errors: Vec<RejectedRow> = Vec::new();
        let rows: Vec<ExcelStudentRow> = {
            let mut on_row_error = |row_number: usize, message: &str| {
                error!(row = row_number, error = message, "数据行错误");
                row_errors.push(RejectedRow {
                    row_number,
                    message: message.to_string(),
                });
            };
            self.extractor
                .extract(payload, token, Some(&mut on_row_error))?
        };

        info!(count = rows.len(), "学生数据抽取完成");

        let students: Vec<Student> = rows.into_iter().map(ExcelStudentRow::into_entity).collect();
        let imported = cancellable(token, self.repo.import(students)).await?;
        info!(count = imported, "学生数据已落库");

        let rejected_rows = row_errors
            .iter()
            .map(|e| e.row_number)
            .collect::<BTreeSet<_>>()
            .len();

        Ok(ImportSummary {
            imported,
            rejected_rows,
            row_errors,
        })
    }

    // ==========================================
    // 分页查询
    // ==========================================

    /// 分页查询（缓存优先）
    ///
    /// 缓存键由全部查询参数确定；导入后不主动失效，陈旧窗口等于滑动过期时间
    #[instrument(skip(self, params, token), fields(key = %params.cache_key()))]
    pub async fn get_students(
        &self,
        params: &StudentQueryParameters,
        token: &CancellationToken,
    ) -> ServiceResult<PagedResult<StudentDto>> {
        match self.try_get_students(params, token).await {
            Ok(page) => ServiceResult::ok(t("student.list_success"), page),
            Err(err) => {
                error!(error = %err, "查询学生列表失败");
                failure(err)
            }
        }
    }

    async fn try_get_students(
        &self,
        params: &StudentQueryParameters,
        token: &CancellationToken,
    ) -> ApiResult<PagedResult<StudentDto>> {
        let key = params.cache_key();

        if let Some(cached) = self.read_cached(&key, token).await? {
            info!(count = cached.items().len(), key = %key, "[Cached] 命中缓存");
            return Ok(cached);
        }

        let query = StudentQuery::compose(params);
        let total = cancellable(token, self.repo.count(&query)).await?;
        let students = cancellable(token, self.repo.fetch_page(&query)).await?;

        let page = PagedResult::new(
            students.iter().map(Student::to_dto).collect(),
            total,
            params.page_number(),
            params.page_size(),
        );
        info!(count = page.items().len(), total, "学生列表查询完成");

        cancellable(token, set_json(self.cache.as_ref(), &key, &page)).await?;
        info!(key = %key, "[Cached] 已写入缓存");

        Ok(page)
    }

    /// 读取缓存；内容无法解析时按未命中处理
    async fn read_cached(
        &self,
        key: &str,
        token: &CancellationToken,
    ) -> ApiResult<Option<PagedResult<StudentDto>>> {
        let Some(raw) = cancellable(token, self.cache.get(key)).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(page) => Ok(Some(page)),
            Err(e) => {
                warn!(key = %key, error = %e, "缓存内容无法解析，按未命中处理");
                Ok(None)
            }
        }
    }

    /// 最近更新的学生（不走缓存）
    pub async fn get_recent_students(
        &self,
        pagination: PaginationParameters,
        token: &CancellationToken,
    ) -> ServiceResult<PagedResult<StudentDto>> {
        match cancellable(token, self.repo.get_all(pagination)).await {
            Ok(page) => ServiceResult::ok(t("student.list_success"), page.map(|s| s.to_dto())),
            Err(err) => {
                error!(error = %err, "查询最近学生失败");
                failure(err)
            }
        }
    }

    // ==========================================
    // 单条查询
    // ==========================================

    #[instrument(skip(self, id, token), fields(id = %id))]
    pub async fn get_student(
        &self,
        id: Uuid,
        token: &CancellationToken,
    ) -> ServiceResult<StudentDto> {
        match cancellable(token, self.repo.get_by_id(id)).await {
            Ok(Some(student)) => {
                info!("学生信息查询完成");
                ServiceResult::ok(t("student.get_success"), student.to_dto())
            }
            Ok(None) => {
                warn!("学生不存在");
                let id = id.to_string();
                ServiceResult::status(
                    StatusCode::NotFound,
                    t_args("student.not_found", &[("id", id.as_str())]),
                )
            }
            Err(err) => {
                error!(error = %err, "查询学生失败");
                failure(err)
            }
        }
    }
}
