//! 推送通道抽象
//!
//! 通过 `PushSender` trait 抽象推送行为。`FcmPushSender` 调用 FCM HTTP
//! 接口执行真实投递；`LogPushSender` 为模拟发送（仅记录日志），便于在
//! 无外部依赖的情况下验证通知管道的完整性。

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::PushConfig;
use crate::error::{CourseError, Result};

/// 推送消息
///
/// `route` 为客户端路由提示，App 收到推送后据此跳转到对应页面。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub route: String,
}

/// 推送发送器 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    /// 向单个推送令牌投递一条消息
    async fn send(&self, token: &str, message: &PushMessage) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FCM 推送发送器
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct FcmData<'a> {
    route: &'a str,
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    to: &'a str,
    notification: FcmNotification<'a>,
    data: FcmData<'a>,
}

/// FCM HTTP 推送发送器
pub struct FcmPushSender {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl FcmPushSender {
    pub fn new(config: &PushConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            server_key: config.server_key.clone(),
        }
    }
}

#[async_trait]
impl PushSender for FcmPushSender {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<()> {
        let request = FcmRequest {
            to: token,
            notification: FcmNotification {
                title: &message.title,
                body: &message.body,
            },
            data: FcmData {
                route: &message.route,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CourseError::Push(format!("FCM 请求失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CourseError::Push(format!(
                "FCM 返回非成功状态: {status}, body={body}"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 模拟推送发送器
// ---------------------------------------------------------------------------

/// 模拟推送发送器
///
/// 本地运行时替代真实 FCM 调用，仅记录日志。
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<()> {
        let message_id = Uuid::now_v7().to_string();

        info!(
            token = %token,
            message_id = %message_id,
            title = %message.title,
            route = %message.route,
            "模拟发送推送通知"
        );

        Ok(())
    }
}
