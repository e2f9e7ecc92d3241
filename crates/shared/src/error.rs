//! 统一错误处理模块
//!
//! 定义系统中所有共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 对调用方暴露的分类只有三种：未认证、参数无效、内部错误；其余变体
//! 用于内部日志定位，最终都折叠为内部错误。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum CourseError {
    // ==================== 调用方错误 ====================
    #[error("未登录，无法执行该操作")]
    Unauthenticated,

    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    // ==================== 外部协作方错误 ====================
    #[error("文档存储错误: {0}")]
    Store(String),

    #[error("身份服务错误: {0}")]
    Identity(String),

    #[error("推送通道错误: {0}")]
    Push(String),

    // ==================== 批量写错误 ====================
    #[error("批量写操作数超限: {size} > {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    // ==================== 通用错误 ====================
    #[error("记录未找到: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, CourseError>;

impl CourseError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Store(_) => "STORE_ERROR",
            Self::Identity(_) => "IDENTITY_ERROR",
            Self::Push(_) => "PUSH_ERROR",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 构造参数错误的便捷方法
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }
}
