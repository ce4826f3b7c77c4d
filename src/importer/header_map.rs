// ==========================================
// 学生花名册服务 - 表头映射
// ==========================================
// 职责: 表头行 + 字段描述表 → 表头到字段的映射（大小写不敏感）
// 规则:
// - 字段的表头名未出现在表头行中 → 静默跳过，字段永远不会被赋值
// - 表头行中多余的列 → 忽略
// - 每次导入构建一次，构建后只读
// ==========================================

use crate::importer::coercion::ValueType;
use std::collections::HashMap;

// ==========================================
// FieldDescriptor - 字段描述
// ==========================================
/// 目标记录的一个字段：(字段, 字段名, 表头名, 类型)
///
/// 未声明表头名时默认使用字段名
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor<F> {
    pub field: F,
    pub name: &'static str,
    pub header: Option<&'static str>,
    pub value_type: ValueType,
}

impl<F> FieldDescriptor<F> {
    pub const fn new(field: F, name: &'static str, value_type: ValueType) -> Self {
        Self {
            field,
            name,
            header: None,
            value_type,
        }
    }

    pub const fn with_header(mut self, header: &'static str) -> Self {
        self.header = Some(header);
        self
    }

    /// 生效的表头名
    pub fn header_label(&self) -> &'static str {
        self.header.unwrap_or(self.name)
    }
}

fn normalize(header: &str) -> String {
    header.trim().to_lowercase()
}

// ==========================================
// HeaderMap - 表头 → 字段描述
// ==========================================
#[derive(Debug)]
pub struct HeaderMap<'a, F> {
    entries: HashMap<String, &'a FieldDescriptor<F>>,
}

impl<'a, F> HeaderMap<'a, F> {
    /// 构建表头映射
    ///
    /// # 参数
    /// - header_row: 表格第一行
    /// - descriptors: 目标记录的字段描述表
    pub fn build(header_row: &[String], descriptors: &'a [FieldDescriptor<F>]) -> Self {
        let present: Vec<String> = header_row.iter().map(|h| normalize(h)).collect();

        let mut entries = HashMap::new();
        for descriptor in descriptors {
            let label = normalize(descriptor.header_label());
            if present.contains(&label) {
                entries.insert(label, descriptor);
            }
        }

        Self { entries }
    }

    /// 按表头查找字段描述（大小写不敏感）
    pub fn get(&self, header: &str) -> Option<&'a FieldDescriptor<F>> {
        self.entries.get(&normalize(header)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
