// ==========================================
// 学生花名册服务 - 健康检查API
// ==========================================

use crate::api::service_result::{ServiceResult, StatusCode};
use crate::cache::{CacheError, CacheResult, CacheService, MemoryCacheService};
use crate::i18n::{t, t_args};
use crate::repository::{SqliteStudentRepository, StudentRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

/// 探测用缓存键
const HEALTH_CHECK_KEY: &str = "__health_check";

/// 依赖状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub database: bool,
    pub cache: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.database && self.cache
    }
}

pub struct HealthApi<R = SqliteStudentRepository, C = MemoryCacheService> {
    repo: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> HealthApi<R, C>
where
    R: StudentRepository,
    C: CacheService,
{
    pub fn new(repo: Arc<R>, cache: Arc<C>) -> Self {
        Self { repo, cache }
    }

    /// 检查存储与缓存是否可用（并发探测）
    #[instrument(skip(self))]
    pub async fn check(&self) -> ServiceResult<HealthReport> {
        let (db, cache) = futures::join!(self.repo.ping(), self.cache_round_trip());

        let mut reasons = Vec::new();
        if let Err(e) = &db {
            warn!(error = %e, "数据库不可用");
            reasons.push(e.to_string());
        }
        if let Err(e) = &cache {
            warn!(error = %e, "缓存不可用");
            reasons.push(e.to_string());
        }

        let report = HealthReport {
            database: db.is_ok(),
            cache: cache.is_ok(),
        };

        if report.is_healthy() {
            ServiceResult::ok(t("health.healthy"), report)
        } else {
            let reason = reasons.join("; ");
            ServiceResult {
                status_code: StatusCode::InternalServerError,
                message: t_args("health.unhealthy", &[("reason", reason.as_str())]),
                data: Some(report),
            }
        }
    }

    async fn cache_round_trip(&self) -> CacheResult<()> {
        self.cache.set(HEALTH_CHECK_KEY, "ok".to_string()).await?;
        let value = self.cache.get(HEALTH_CHECK_KEY).await?;
        self.cache.remove(HEALTH_CHECK_KEY).await?;
        match value.as_deref() {
            Some("ok") => Ok(()),
            _ => Err(CacheError::Unavailable(
                "缓存探测值读回不一致".to_string(),
            )),
        }
    }
}
