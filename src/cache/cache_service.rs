// ==========================================
// 学生花名册服务 - 缓存服务
// ==========================================
// 约定:
// - 值为字符串（调用方负责 JSON 序列化）
// - 滑动过期：每次命中都会重置过期时间
// - 键统一加实例名前缀
// ==========================================

use crate::cache::{CacheError, CacheResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

// ==========================================
// CacheService Trait
// ==========================================
#[async_trait]
pub trait CacheService: Send + Sync {
    /// 读取缓存（未命中或已过期返回 None）
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// 写入缓存（使用服务配置的滑动过期时间）
    async fn set(&self, key: &str, value: String) -> CacheResult<()>;

    /// 删除缓存
    async fn remove(&self, key: &str) -> CacheResult<()>;
}

/// 读取并反序列化
pub async fn get_json<T, C>(cache: &C, key: &str) -> CacheResult<Option<T>>
where
    T: DeserializeOwned,
    C: CacheService + ?Sized,
{
    match cache.get(key).await? {
        Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}

/// 序列化并写入
pub async fn set_json<T, C>(cache: &C, key: &str, item: &T) -> CacheResult<()>
where
    T: Serialize + Sync,
    C: CacheService + ?Sized,
{
    let raw = serde_json::to_string(item)?;
    cache.set(key, raw).await
}

// ==========================================
// MemoryCacheService - 进程内缓存
// ==========================================
struct CacheEntry {
    value: String,
    last_access: Instant,
}

pub struct MemoryCacheService {
    entries: Mutex<HashMap<String, CacheEntry>>,
    sliding_ttl: Duration,
    instance_name: String,
}

impl MemoryCacheService {
    /// # 参数
    /// - instance_name: 键前缀
    /// - sliding_ttl: 滑动过期时间
    pub fn new(instance_name: impl Into<String>, sliding_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            sliding_ttl,
            instance_name: instance_name.into(),
        }
    }

    pub fn sliding_ttl(&self) -> Duration {
        self.sliding_ttl
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.instance_name, key)
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, HashMap<String, CacheEntry>>> {
        self.entries
            .lock()
            .map_err(|e| CacheError::LockError(e.to_string()))
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.duration_since(entry.last_access) >= self.sliding_ttl
    }

    /// 清理已过期条目
    ///
    /// # 返回
    /// - 被清理的条目数
    pub fn purge_expired(&self) -> CacheResult<usize> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "已清理过期缓存");
        }
        Ok(removed)
    }

    /// 当前条目数（含尚未清理的过期条目）
    pub fn len(&self) -> CacheResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.lock()?.is_empty())
    }
}

#[async_trait]
impl CacheService for MemoryCacheService {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let full_key = self.full_key(key);
        let now = Instant::now();
        let mut entries = self.lock()?;

        let Some(entry) = entries.get_mut(&full_key) else {
            return Ok(None);
        };

        if self.is_expired(entry, now) {
            entries.remove(&full_key);
            return Ok(None);
        }

        entry.last_access = now;
        Ok(Some(entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String) -> CacheResult<()> {
        let full_key = self.full_key(key);
        let mut entries = self.lock()?;
        entries.insert(
            full_key,
            CacheEntry {
                value,
                last_access: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        let full_key = self.full_key(key);
        self.lock()?.remove(&full_key);
        Ok(())
    }
}
