//! 账号服务错误类型定义
//!
//! 对调用方只暴露三种失败分类：未认证、参数无效、内部错误。
//! 下游提供方（身份服务、文档存储）的任何失败统一折叠为内部错误，
//! 详细信息仅记录日志，防止信息泄露。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use course_shared::error::CourseError;

/// 账号服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("未登录，无法执行该操作")]
    Unauthenticated,

    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, AccountError>;

impl AccountError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<CourseError> for AccountError {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::Unauthenticated => Self::Unauthenticated,
            CourseError::InvalidArgument { field, message } => {
                Self::InvalidArgument(format!("{field}: {message}"))
            }
            // 提供方失败对调用方一律是内部错误
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AccountError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidArgument(errors.to_string())
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 内部错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "账号操作内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AccountError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountError::InvalidArgument("uid".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AccountError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_errors_fold_to_internal() {
        let err: AccountError = CourseError::Identity("账号不存在".to_string()).into();
        assert!(matches!(err, AccountError::Internal(_)));

        let err: AccountError = CourseError::Store("连接失败".to_string()).into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_caller_errors_keep_their_kind() {
        let err: AccountError = CourseError::Unauthenticated.into();
        assert!(matches!(err, AccountError::Unauthenticated));

        let err: AccountError = CourseError::invalid_argument("uid", "不能为空").into();
        assert!(matches!(err, AccountError::InvalidArgument(_)));
    }
}
