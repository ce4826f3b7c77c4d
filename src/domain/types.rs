// ==========================================
// 学生花名册服务 - 领域类型定义
// ==========================================
// 职责: 封闭枚举（性别/婚姻状况/排序字段/排序方向）
// 约束: 表格导入按符号名做大小写不敏感的精确匹配
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SheetEnum - 可从表格单元格解析的封闭枚举
// ==========================================
/// 表格中的枚举列只认符号名（大小写不敏感），数字等其它写法一律拒绝
pub trait SheetEnum: Sized + Copy + 'static {
    /// 枚举名（用于错误提示）
    const TYPE_NAME: &'static str;

    /// 全部取值
    fn variants() -> &'static [Self];

    /// 符号名
    fn symbol(&self) -> &'static str;

    /// 按符号名匹配（大小写不敏感）
    fn from_symbol(text: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.symbol().eq_ignore_ascii_case(text))
    }
}

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl SheetEnum for Gender {
    const TYPE_NAME: &'static str = "Gender";

    fn variants() -> &'static [Self] {
        &[Gender::Male, Gender::Female]
    }

    fn symbol(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ==========================================
// 婚姻状况 (Marital Status)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
}

impl SheetEnum for MaritalStatus {
    const TYPE_NAME: &'static str = "MaritalStatus";

    fn variants() -> &'static [Self] {
        &[MaritalStatus::Single, MaritalStatus::Married]
    }

    fn symbol(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ==========================================
// 排序字段 (Sort Field)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentSortField {
    #[default]
    Name,
    Roll,
    Age,
}

impl StudentSortField {
    /// 宽松解析：未识别的字段回落到 Name
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "roll" => StudentSortField::Roll,
            "age" => StudentSortField::Age,
            _ => StudentSortField::Name,
        }
    }
}

impl fmt::Display for StudentSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentSortField::Name => write!(f, "Name"),
            StudentSortField::Roll => write!(f, "Roll"),
            StudentSortField::Age => write!(f, "Age"),
        }
    }
}

// ==========================================
// 排序方向 (Sort Direction)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// 宽松解析：只有 desc/descending 视为降序
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    /// SQL 关键字
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "Asc"),
            SortDirection::Desc => write!(f, "Desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol_case_insensitive() {
        assert_eq!(Gender::from_symbol("female"), Some(Gender::Female));
        assert_eq!(Gender::from_symbol("MALE"), Some(Gender::Male));
        assert_eq!(MaritalStatus::from_symbol("mArRiEd"), Some(MaritalStatus::Married));
    }

    #[test]
    fn test_from_symbol_rejects_numbers_and_partials() {
        assert_eq!(Gender::from_symbol("1"), None);
        assert_eq!(Gender::from_symbol("Fem"), None);
        assert_eq!(MaritalStatus::from_symbol("Single "), None);
    }

    #[test]
    fn test_sort_parse_lenient() {
        assert_eq!(StudentSortField::parse_lenient("ROLL"), StudentSortField::Roll);
        assert_eq!(StudentSortField::parse_lenient("salary"), StudentSortField::Name);
        assert_eq!(SortDirection::parse_lenient("Desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient("sideways"), SortDirection::Asc);
    }
}
