// ==========================================
// 学生花名册服务 - 分页与查询参数
// ==========================================
// 约束: 页大小在赋值时收敛到 [1, MAX_PAGE_SIZE]，读取时不再处理
// ==========================================

use crate::config::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::types::{SortDirection, StudentSortField};
use serde::{Deserialize, Serialize};

// ==========================================
// PagedResult - 分页结果
// ==========================================
/// 一页数据 + 分页元信息
///
/// 派生字段（总页数/是否有上一页/下一页）在构造时计算，
/// 序列化后随缓存一起存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    items: Vec<T>,
    total_count: u64,
    page_number: u32,
    page_size: u32,
    total_pages: u64,
    has_previous: bool,
    has_next: bool,
}

impl<T> PagedResult<T> {
    /// 构造分页结果
    ///
    /// # 参数
    /// - items: 当前页数据
    /// - total_count: 过滤后（分页前）的总条数
    /// - page_number: 当前页码（从 1 开始）
    /// - page_size: 页大小（>= 1）
    pub fn new(items: Vec<T>, total_count: u64, page_number: u32, page_size: u32) -> Self {
        let size = u64::from(page_size.max(1));
        let total_pages = total_count.div_ceil(size);

        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages,
            has_previous: page_number > 1,
            has_next: u64::from(page_number) < total_pages,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// 转换元素类型，分页元信息保持不变
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

// ==========================================
// PaginationParameters - 分页参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaginationParameters {
    page_number: u32,
    page_size: u32,
}

impl Default for PaginationParameters {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParameters {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        let mut params = Self::default();
        params.set_page_number(page_number);
        params.set_page_size(page_size);
        params
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 页码最小为 1
    pub fn set_page_number(&mut self, page_number: u32) {
        self.page_number = page_number.max(1);
    }

    /// 页大小收敛到 [1, MAX_PAGE_SIZE]
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    }

    /// 跳过的行数 (page_number - 1) * page_size
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }
}

// ==========================================
// StudentQueryParameters - 学生查询参数
// ==========================================
/// 搜索 + 排序 + 分页
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StudentQueryParameters {
    pub pagination: PaginationParameters,
    pub search_term: Option<String>,
    pub sort_by: StudentSortField,
    pub sort_direction: SortDirection,
}

impl StudentQueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page_number: u32, page_size: u32) -> Self {
        self.pagination = PaginationParameters::new(page_number, page_size);
        self
    }

    /// 空字符串视为未提供
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search_term = if term.is_empty() { None } else { Some(term) };
        self
    }

    pub fn with_sort(mut self, sort_by: StudentSortField, sort_direction: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.sort_direction = sort_direction;
        self
    }

    pub fn page_number(&self) -> u32 {
        self.pagination.page_number()
    }

    pub fn page_size(&self) -> u32 {
        self.pagination.page_size()
    }

    /// 生效的搜索词（空串视为无搜索）
    pub fn effective_search(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|s| !s.is_empty())
    }

    /// 缓存键: students_{页码}_{页大小}_{搜索词}_{排序字段}_{排序方向}
    ///
    /// 相同参数总是得到相同的键
    pub fn cache_key(&self) -> String {
        format!(
            "students_{}_{}_{}_{}_{}",
            self.page_number(),
            self.page_size(),
            self.effective_search().unwrap_or(""),
            self.sort_by,
            self.sort_direction
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_clamped_on_assignment() {
        assert_eq!(PaginationParameters::new(1, 500).page_size(), 100);
        assert_eq!(PaginationParameters::new(1, 0).page_size(), 1);
        assert_eq!(PaginationParameters::new(0, 10).page_number(), 1);
        assert_eq!(PaginationParameters::default().page_size(), 10);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PaginationParameters::new(1, 10).offset(), 0);
        assert_eq!(PaginationParameters::new(3, 25).offset(), 50);
    }

    #[test]
    fn test_paged_result_derived_fields() {
        let page: PagedResult<u32> = PagedResult::new(vec![1, 2, 3, 4, 5], 15, 2, 10);
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let first: PagedResult<u32> = PagedResult::new(vec![], 15, 1, 10);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let empty: PagedResult<u32> = PagedResult::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn test_paged_result_serializes_camel_case() {
        let page: PagedResult<u32> = PagedResult::new(vec![1], 1, 1, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["hasNext"], false);

        let back: PagedResult<u32> = serde_json::from_value(json).unwrap();
        assert_eq!(back, page);
    }

    #[test]
    fn test_cache_key_deterministic() {
        let a = StudentQueryParameters::new()
            .with_page(2, 20)
            .with_search("ada")
            .with_sort(StudentSortField::Roll, SortDirection::Desc);
        let b = a.clone();
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "students_2_20_ada_Roll_Desc");

        let defaults = StudentQueryParameters::new();
        assert_eq!(defaults.cache_key(), "students_1_10__Name_Asc");
        assert_ne!(a.cache_key(), defaults.cache_key());
    }

    #[test]
    fn test_empty_search_is_absent() {
        let params = StudentQueryParameters::new().with_search("");
        assert_eq!(params.effective_search(), None);
    }
}
