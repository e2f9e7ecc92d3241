//! 数据模型
//!
//! 与托管平台中持久化文档一一对应的 serde 模型。字段名通过 `camelCase`
//! 重命名与线上文档布局保持一致：`users/{uid}`、`users/{uid}/notifications/{id}`、
//! `courses/{courseId}`、`courses/{courseId}/attendees/{attendeeId}`。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Member,
    Admin,
}

/// 用户档案文档（`users/{uid}`）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub role: UserRole,
    /// 禁用标记，与身份服务中的 disabled 标志互为镜像
    pub is_disabled: bool,
    /// 推送令牌，未注册推送端点的用户为 None
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 课程文档（`courses/{courseId}`）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDoc {
    pub course_id: String,
    pub title: String,
    /// 上课时间
    pub date: DateTime<Utc>,
    /// 已预约人数计数器
    pub booked_spots: i32,
}

/// 预约文档（`courses/{courseId}/attendees/{attendeeId}`）
///
/// `user_id` 允许为空（线下代订等场景），也允许悬挂引用已删除的用户。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDoc {
    pub booking_id: String,
    /// 父课程 ID
    pub course_id: String,
    pub user_id: Option<String>,
    /// 下单时的展示名快照，用户改名后不变
    pub displayed_name: String,
}

/// 通知文档（`users/{uid}/notifications/{id}`）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDoc {
    pub notification_id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl NotificationDoc {
    /// 创建一条未读通知，ID 使用 UUID v7 保持时间有序
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            notification_id: Uuid::now_v7().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
            read: false,
        }
    }
}

/// 通知的跨集合引用，用于保留期清理时定位待删除文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRef {
    pub user_id: String,
    pub notification_id: String,
}
