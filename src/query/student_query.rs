// ==========================================
// 学生花名册服务 - 学生查询组合器
// ==========================================
// 职责: 查询参数 → 过滤 + 排序 + 分页 的 SQL
// 规则:
// - 搜索词转小写后，对 名/姓/学号文本/年龄文本 做子串匹配，任一命中即可
// - 名/姓的匹配与排序使用写入时生成的小写键列（Unicode 全量折叠）
// - 排序: Name = 名 → 姓；Roll / Age 各自为主键，姓为次键；最后以 id 兜底
// - 总数基于过滤后、分页前的结果集
// ==========================================

use crate::domain::types::{SortDirection, StudentSortField};
use crate::domain::StudentQueryParameters;
use crate::query::sql_builder::SqlQueryBuilder;

/// student 表的全部列（与 repository 行映射顺序一致）
pub const STUDENT_COLUMNS: &str = "id, first_name, last_name, roll, age, phone_number, \
     email_address, gender, education, occupation, experience, salary, marital_status, \
     number_of_children, created_at, last_updated";

/// 搜索条件，?1 为小写搜索词
const SEARCH_CONDITIONS: &[&str] = &[
    "instr(first_name_key, ?1) > 0",
    "instr(last_name_key, ?1) > 0",
    "instr(CAST(roll AS TEXT), ?1) > 0",
    "instr(CAST(age AS TEXT), ?1) > 0",
];

/// 名/姓键列与搜索词共用的小写折叠
///
/// SQLite 内置 lower()/NOCASE 只处理 ASCII，折叠统一在 Rust 侧完成
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

// ==========================================
// StudentQuery - 组合后的查询
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentQuery {
    search: Option<String>,
    sort_by: StudentSortField,
    direction: SortDirection,
    limit: u32,
    offset: u64,
}

impl StudentQuery {
    /// 由查询参数组合
    pub fn compose(params: &StudentQueryParameters) -> Self {
        Self {
            search: params.effective_search().map(search_key),
            sort_by: params.sort_by,
            direction: params.sort_direction,
            limit: params.page_size(),
            offset: params.pagination.offset(),
        }
    }

    /// 小写后的搜索词
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sort_by(&self) -> StudentSortField {
        self.sort_by
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 绑定参数（按 ?1.. 顺序）
    pub fn bind_values(&self) -> Vec<String> {
        self.search.iter().cloned().collect()
    }

    /// ORDER BY 子句（不含关键字）
    pub fn order_by_clause(&self) -> String {
        let dir = self.direction.as_sql();
        match self.sort_by {
            StudentSortField::Name => {
                format!("first_name_key {dir}, last_name_key {dir}, id ASC")
            }
            StudentSortField::Roll => format!("roll {dir}, last_name_key {dir}, id ASC"),
            StudentSortField::Age => format!("age {dir}, last_name_key {dir}, id ASC"),
        }
    }

    fn filtered(&self, select: &str) -> SqlQueryBuilder {
        let builder = SqlQueryBuilder::new(select);
        if self.search.is_some() {
            builder.any_of(SEARCH_CONDITIONS)
        } else {
            builder
        }
    }

    /// 过滤后的总数
    pub fn count_sql(&self) -> String {
        self.filtered("SELECT COUNT(*) FROM student").build()
    }

    /// 当前页数据
    pub fn page_sql(&self) -> String {
        self.filtered(&format!("SELECT {} FROM student", STUDENT_COLUMNS))
            .order_by(&self.order_by_clause())
            .limit(u64::from(self.limit))
            .offset(self.offset)
            .build()
    }
}
