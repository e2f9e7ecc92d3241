//! 请求/响应 DTO
//!
//! 统一的响应信封与两个调用式操作的请求体。

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 统一 API 响应信封
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code: "OK",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// 只携带状态文案的成功响应
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "OK",
            message: message.into(),
            data: None,
        }
    }
}

/// 账号启停切换请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleUserStatusRequest {
    /// 目标账号 uid；缺失或为空时返回参数无效
    #[serde(default)]
    #[validate(length(max = 128, message = "uid 最长 128 字符"))]
    pub uid: Option<String>,
}

/// 账号级联删除请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserAccountRequest {
    #[serde(default)]
    #[validate(length(max = 128, message = "uid 最长 128 字符"))]
    pub uid: Option<String>,
}
