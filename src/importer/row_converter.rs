// ==========================================
// 学生花名册服务 - 行转换器
// ==========================================
// 职责: 一行单元格 → 目标记录 + 列级错误列表
// 规则:
// - 只处理表头映射中存在的列；超出表头或数据行长度的位置跳过
// - 单元格转换失败 → 记录列错误，字段保持零值，继续处理其余列
// - 无错误的行才会被接受
// ==========================================

use crate::importer::coercion::{coerce, CellValue};
use crate::importer::error::CoercionResult;
use crate::importer::header_map::{FieldDescriptor, HeaderMap};
use serde::Serialize;
use std::fmt;

// ==========================================
// SheetRecord - 可由表格行填充的记录
// ==========================================
pub trait SheetRecord: Default {
    /// 字段标识（通常是无数据枚举）
    type Field: Copy + fmt::Debug + 'static;

    /// 静态字段描述表
    fn fields() -> &'static [FieldDescriptor<Self::Field>];

    /// 为字段赋值（值类型由描述表保证）
    fn assign(&mut self, field: Self::Field, value: CellValue) -> CoercionResult<()>;
}

// ==========================================
// RowError - 行错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row_number: usize,
    pub column: String,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "列 '{}': {}", self.column, self.message)
    }
}

/// 单行转换结果
#[derive(Debug)]
pub struct RowConversion<T> {
    pub record: T,
    pub errors: Vec<RowError>,
}

impl<T> RowConversion<T> {
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }

    /// 有错误时返回全部行错误
    pub fn into_result(self) -> Result<T, Vec<RowError>> {
        if self.errors.is_empty() {
            Ok(self.record)
        } else {
            Err(self.errors)
        }
    }
}

/// 转换一行数据
///
/// # 参数
/// - row_number: 行号（仅用于错误报告）
/// - data_row: 数据行单元格
/// - header_row: 表头行
/// - header_map: 表头映射
pub fn convert_row<T: SheetRecord>(
    row_number: usize,
    data_row: &[String],
    header_row: &[String],
    header_map: &HeaderMap<'_, T::Field>,
) -> RowConversion<T> {
    let mut record = T::default();
    let mut errors = Vec::new();

    for (header, raw) in header_row.iter().zip(data_row.iter()) {
        let Some(descriptor) = header_map.get(header) else {
            continue;
        };

        let outcome = coerce(raw, &descriptor.value_type).and_then(|value| match value {
            Some(value) => record.assign(descriptor.field, value),
            None => Ok(()),
        });

        if let Err(e) = outcome {
            errors.push(RowError {
                row_number,
                column: header.clone(),
                message: e.to_string(),
            });
        }
    }

    RowConversion { record, errors }
}
