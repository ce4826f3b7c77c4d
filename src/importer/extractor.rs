// ==========================================
// 学生花名册服务 - 表格抽取流水线
// ==========================================
// 流程:
// 1. 读取文件 → 原始行（读取失败/空文件 → 0 行，不报错）
// 2. 第一行作为表头，构建表头映射
// 3. 逐行转换；合格行按原顺序收集，不合格行的每条错误回调给调用方
// 取消: 读取前与每行之间检查取消信号
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use crate::importer::header_map::HeaderMap;
use crate::importer::row_converter::{convert_row, RowError, SheetRecord};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

// ==========================================
// FilePayload - 上传的文件
// ==========================================
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// 从磁盘读取
    pub fn from_path<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, content })
    }

    /// 小写扩展名（带前导点），无扩展名时为 None
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// ==========================================
// SpreadsheetExtractor - 抽取器
// ==========================================
#[derive(Default)]
pub struct SpreadsheetExtractor {
    parser: UniversalFileParser,
}

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 抽取文件中的所有合格记录
    ///
    /// # 参数
    /// - payload: 文件内容 + 原始文件名
    /// - token: 取消信号
    /// - on_row_error: 行错误回调 (行号, 错误信息)，行号从 1 开始且表头为第 1 行
    ///
    /// # 返回
    /// - Ok(Vec<T>): 合格记录（原始行序）
    /// - Err(ImportError::Cancelled): 已取消
    pub fn extract<T: SheetRecord>(
        &self,
        payload: &FilePayload,
        token: &CancellationToken,
        mut on_row_error: Option<&mut dyn FnMut(usize, &str)>,
    ) -> ImportResult<Vec<T>> {
        if token.is_cancelled() {
            return Err(ImportError::Cancelled);
        }

        let rows = self.load_rows(payload);
        let mut rows = rows.into_iter();

        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };

        let header_map = HeaderMap::build(&header.cells, T::fields());
        debug!(
            file_name = %payload.file_name,
            mapped_columns = header_map.len(),
            "表头映射完成"
        );

        let mut result = Vec::new();
        for row in rows {
            if token.is_cancelled() {
                return Err(ImportError::Cancelled);
            }

            let row_number = row.line - header.line + 1;

            // 映射列中存在无法解码的单元格 → 整行拒绝
            let encoding_errors = undecodable_errors(row_number, &row, &header.cells, |h| {
                header_map.get(h).is_some()
            });
            if !encoding_errors.is_empty() {
                if let Some(callback) = on_row_error.as_mut() {
                    for error in &encoding_errors {
                        callback(row_number, &error.to_string());
                    }
                }
                continue;
            }

            match convert_row::<T>(row_number, &row.cells, &header.cells, &header_map).into_result()
            {
                Ok(record) => result.push(record),
                Err(errors) => {
                    if let Some(callback) = on_row_error.as_mut() {
                        for error in &errors {
                            callback(row_number, &error.to_string());
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    /// 读取文件为原始行
    ///
    /// 空文件、无扩展名、读取失败均视为 0 行
    pub fn load_rows(&self, payload: &FilePayload) -> Vec<RawRow> {
        if payload.is_empty() {
            return Vec::new();
        }

        let Some(extension) = payload.extension() else {
            warn!(file_name = %payload.file_name, "文件无扩展名，按空文件处理");
            return Vec::new();
        };

        match self.parser.parse(&extension, &payload.content) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(file_name = %payload.file_name, error = %e, "文件读取失败，按空文件处理");
                Vec::new()
            }
        }
    }
}

/// 映射列中无法按 UTF-8 解码的单元格 → 行错误
fn undecodable_errors(
    row_number: usize,
    row: &RawRow,
    header_row: &[String],
    is_mapped: impl Fn(&str) -> bool,
) -> Vec<RowError> {
    row.undecodable
        .iter()
        .filter_map(|&col| header_row.get(col))
        .filter(|header| is_mapped(header))
        .map(|header| RowError {
            row_number,
            column: header.clone(),
            message: "单元格不是有效的 UTF-8 文本".to_string(),
        })
        .collect()
}
