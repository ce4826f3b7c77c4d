// ==========================================
// 学生花名册服务 - SQL 构建工具
// ==========================================
// 职责: 流式拼装 SELECT 语句（条件/排序/分页）
// 参数值一律走绑定参数，这里只拼装结构
// ==========================================

/// SQL 查询构建器（流式 API）
///
/// # 示例
/// ```
/// use student_roster::query::sql_builder::SqlQueryBuilder;
///
/// let sql = SqlQueryBuilder::new("SELECT * FROM student")
///     .any_of(&["first_name = ?1", "last_name = ?1"])
///     .order_by("roll ASC")
///     .limit(10)
///     .offset(20)
///     .build();
///
/// assert_eq!(
///     sql,
///     "SELECT * FROM student WHERE (first_name = ?1 OR last_name = ?1) ORDER BY roll ASC LIMIT 10 OFFSET 20"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    order_by_clause: Option<String>,
    limit_clause: Option<u64>,
    offset_clause: Option<u64>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            order_by_clause: None,
            limit_clause: None,
            offset_clause: None,
        }
    }

    /// 添加一组 OR 条件（多组之间为 AND）
    pub fn any_of(mut self, conditions: &[&str]) -> Self {
        if !conditions.is_empty() {
            self.where_clauses
                .push(format!("({})", conditions.join(" OR ")));
        }
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 添加 LIMIT 子句
    pub fn limit(mut self, n: u64) -> Self {
        self.limit_clause = Some(n);
        self
    }

    /// 添加 OFFSET 子句（SQLite 要求同时存在 LIMIT，缺省时补 LIMIT -1）
    pub fn offset(mut self, n: u64) -> Self {
        self.offset_clause = Some(n);
        self
    }

    /// 构建最终的 SQL 语句
    pub fn build(&self) -> String {
        let mut sql = self.select_clause.clone();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        match (self.limit_clause, self.offset_clause) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        sql
    }
}

// ==========================================
// 单元测试
// ==========================================
