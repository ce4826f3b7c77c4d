// ==========================================
// 学生花名册服务 - 类型转换单元
// ==========================================
// 职责: 单元格文本 → 字段语义类型
// 规则:
// - 空白单元格 → 缺省值（不是错误），与目标类型无关
// - 枚举: 符号名大小写不敏感精确匹配
// - 长整数: 先整数解析，失败再按浮点解析并在范围内截断
// - 其余类型: 只做一次直接解析，失败即报错
// 纯函数，无副作用
// ==========================================

use crate::domain::types::SheetEnum;
use crate::importer::error::{CoercionError, CoercionResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// 时间戳可接受的格式（按顺序尝试）
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y%m%d%H%M%S",
];

// 纯日期格式（时间取 00:00:00）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

// ==========================================
// EnumSpec - 枚举目标类型描述
// ==========================================
/// 枚举列的静态描述：名称 + 符号名解析函数
#[derive(Clone, Copy)]
pub struct EnumSpec {
    pub name: &'static str,
    resolve: fn(&str) -> Option<&'static str>,
}

impl EnumSpec {
    /// 由 SheetEnum 构造（可用于 static 字段表）
    pub const fn of<E: SheetEnum>() -> Self {
        Self {
            name: E::TYPE_NAME,
            resolve: resolve_symbol::<E>,
        }
    }

    /// 匹配符号名，返回规范写法
    pub fn resolve(&self, text: &str) -> Option<&'static str> {
        (self.resolve)(text)
    }
}

fn resolve_symbol<E: SheetEnum>(text: &str) -> Option<&'static str> {
    E::from_symbol(text).map(|v| v.symbol())
}

impl fmt::Debug for EnumSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumSpec").field("name", &self.name).finish()
    }
}

impl PartialEq for EnumSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// ==========================================
// ValueType - 字段语义类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueType {
    Text,
    LargeInteger,
    SmallInteger,
    Float,
    Decimal,
    Boolean,
    Timestamp,
    Enumeration(EnumSpec),
    // 以下走通用 FromStr 转换
    Date,
    Guid,
}

impl ValueType {
    /// 类型的展示名（用于错误信息）
    pub fn display_name(&self) -> &'static str {
        match self {
            ValueType::Text => "文本",
            ValueType::LargeInteger => "长整数",
            ValueType::SmallInteger => "整数",
            ValueType::Float => "浮点数",
            ValueType::Decimal => "定点小数",
            ValueType::Boolean => "布尔值",
            ValueType::Timestamp => "时间戳",
            ValueType::Enumeration(spec) => spec.name,
            ValueType::Date => "日期",
            ValueType::Guid => "GUID",
        }
    }
}

// ==========================================
// CellValue - 转换后的单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    LargeInteger(i64),
    SmallInteger(i32),
    Float(f64),
    Decimal(Decimal),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Symbol(&'static str),
    Date(NaiveDate),
    Guid(Uuid),
}

/// 将单元格文本转换为目标类型
///
/// # 返回
/// - Ok(None): 空白单元格
/// - Ok(Some(value)): 转换成功
/// - Err(CoercionError): 无法转换
pub fn coerce(raw: &str, target: &ValueType) -> CoercionResult<Option<CellValue>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value = match target {
        ValueType::Text => CellValue::Text(raw.to_string()),
        ValueType::Enumeration(spec) => {
            let symbol = spec
                .resolve(raw.trim())
                .ok_or_else(|| CoercionError::InvalidEnum {
                    input: raw.to_string(),
                    enum_name: spec.name.to_string(),
                })?;
            CellValue::Symbol(symbol)
        }
        ValueType::LargeInteger => CellValue::LargeInteger(parse_large_integer(raw)?),
        ValueType::SmallInteger => {
            CellValue::SmallInteger(raw.trim().parse::<i32>().map_err(|_| invalid(raw, target))?)
        }
        ValueType::Float => {
            CellValue::Float(raw.trim().parse::<f64>().map_err(|_| invalid(raw, target))?)
        }
        ValueType::Decimal => {
            CellValue::Decimal(Decimal::from_str(raw.trim()).map_err(|_| invalid(raw, target))?)
        }
        ValueType::Boolean => CellValue::Boolean(parse_boolean(raw).ok_or_else(|| invalid(raw, target))?),
        ValueType::Timestamp => {
            CellValue::Timestamp(parse_timestamp(raw).ok_or_else(|| invalid(raw, target))?)
        }
        ValueType::Date => CellValue::Date(parse_generic::<NaiveDate>(raw, target)?),
        ValueType::Guid => CellValue::Guid(parse_generic::<Uuid>(raw, target)?),
    };

    Ok(Some(value))
}

fn invalid(raw: &str, target: &ValueType) -> CoercionError {
    CoercionError::InvalidValue {
        input: raw.to_string(),
        type_name: target.display_name().to_string(),
    }
}

/// 长整数：整数解析失败时按浮点解析并截断（仅限 i64 范围内）
fn parse_large_integer(raw: &str) -> CoercionResult<i64> {
    let text = raw.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Ok(v);
    }

    if let Ok(f) = text.parse::<f64>() {
        // i64::MAX as f64 == 2^63，上界取开区间
        if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return Ok(f.trunc() as i64);
        }
    }

    Err(invalid(raw, &ValueType::LargeInteger))
}

fn parse_boolean(raw: &str) -> Option<bool> {
    let text = raw.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

/// 通用文本 → 类型转换
fn parse_generic<T: FromStr>(raw: &str, target: &ValueType) -> CoercionResult<T> {
    raw.trim().parse::<T>().map_err(|_| invalid(raw, target))
}
