// ==========================================
// 学生花名册服务 - 服务结果
// ==========================================
// 状态码 + 消息 + 可选数据，边界层统一返回该结构
// ==========================================

use crate::api::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP 风格的状态分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    Ok,
    Created,
    BadRequest,
    NotFound,
    ClientClosedRequest,
    InternalServerError,
}

impl StatusCode {
    /// 数值码
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::ClientClosedRequest => 499,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok | StatusCode::Created)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// 服务结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult<T> {
    pub status_code: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ServiceResult<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::Ok,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::Created,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 无数据的结果
    pub fn status(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            data: None,
        }
    }

    /// 错误 → 结果（状态码由错误分类决定，消息保留原因）
    pub fn from_error(err: &ApiError) -> Self {
        Self::status(err.status_code(), err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status_code.is_success()
    }
}
