//! 测试工具模块
//!
//! 提供测试所需的文档构造器、时间辅助、记录型推送发送器和故障注入存储。
//! 用于简化测试代码编写，提高测试的可重复性。

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{CourseError, Result};
use crate::models::{BookingDoc, CourseDoc, NotificationDoc, NotificationRef, UserProfile, UserRole};
use crate::push::{PushMessage, PushSender};
use crate::store::{DocumentStore, WriteBatch};

// ==================== ID 与时间辅助 ====================

/// 生成唯一的测试用户 ID
pub fn test_user_id() -> String {
    format!("test-user-{}", Uuid::new_v4())
}

/// 生成唯一的测试课程 ID
pub fn test_course_id() -> String {
    format!("test-course-{}", Uuid::new_v4())
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

pub fn days_ahead(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

// ==================== 文档构造器 ====================

/// 构造普通成员档案
pub fn member(uid: &str, fcm_token: Option<&str>) -> UserProfile {
    UserProfile {
        uid: uid.to_string(),
        display_name: format!("成员-{uid}"),
        role: UserRole::Member,
        is_disabled: false,
        fcm_token: fcm_token.map(|t| t.to_string()),
        created_at: Utc::now(),
    }
}

/// 构造管理员档案
pub fn admin(uid: &str) -> UserProfile {
    UserProfile {
        role: UserRole::Admin,
        display_name: format!("管理员-{uid}"),
        ..member(uid, None)
    }
}

pub fn course_doc(course_id: &str, date: DateTime<Utc>, booked_spots: i32) -> CourseDoc {
    CourseDoc {
        course_id: course_id.to_string(),
        title: format!("课程-{course_id}"),
        date,
        booked_spots,
    }
}

pub fn booking_doc(course_id: &str, booking_id: &str, user_id: Option<&str>) -> BookingDoc {
    BookingDoc {
        booking_id: booking_id.to_string(),
        course_id: course_id.to_string(),
        user_id: user_id.map(|u| u.to_string()),
        displayed_name: user_id
            .map(|u| format!("成员-{u}"))
            .unwrap_or_else(|| "代订".to_string()),
    }
}

// ==================== 记录型推送发送器 ====================

/// 记录型推送发送器
///
/// 记录每次投递的令牌与消息，供断言使用；可配置为总是失败，
/// 用于验证调用方吞掉投递失败的行为。
#[derive(Default)]
pub struct RecordingPushSender {
    sent: Mutex<Vec<(String, PushMessage)>>,
    fail: bool,
}

impl RecordingPushSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建总是投递失败的发送器
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl PushSender for RecordingPushSender {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<()> {
        if self.fail {
            return Err(CourseError::Push("注入的投递失败".to_string()));
        }
        self.sent
            .lock()
            .push((token.to_string(), message.clone()));
        Ok(())
    }
}

// ==================== 故障注入存储 ====================

/// 每个操作都返回存储错误的 `DocumentStore`
///
/// 用于验证调用方在存储不可用时的吞错/报错路径。
pub struct FailingStore;

impl FailingStore {
    fn err<T>() -> Result<T> {
        Err(CourseError::Store("注入的存储故障".to_string()))
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get_user(&self, _uid: &str) -> Result<Option<UserProfile>> {
        Self::err()
    }

    async fn set_user_disabled(&self, _uid: &str, _disabled: bool) -> Result<()> {
        Self::err()
    }

    async fn list_admins(&self) -> Result<Vec<UserProfile>> {
        Self::err()
    }

    async fn delete_user_tree(&self, _uid: &str) -> Result<()> {
        Self::err()
    }

    async fn add_notification(&self, _uid: &str, _notification: &NotificationDoc) -> Result<()> {
        Self::err()
    }

    async fn notifications_created_before(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<Vec<NotificationRef>> {
        Self::err()
    }

    async fn get_course(&self, _course_id: &str) -> Result<Option<CourseDoc>> {
        Self::err()
    }

    async fn list_bookings(&self, _course_id: &str) -> Result<Vec<BookingDoc>> {
        Self::err()
    }

    async fn find_bookings_by_user(&self, _uid: &str) -> Result<Vec<BookingDoc>> {
        Self::err()
    }

    async fn courses_scheduled_before(&self, _cutoff: DateTime<Utc>) -> Result<Vec<String>> {
        Self::err()
    }

    async fn delete_course_tree(&self, _course_id: &str) -> Result<()> {
        Self::err()
    }

    async fn commit(&self, _batch: WriteBatch) -> Result<()> {
        Self::err()
    }
}
