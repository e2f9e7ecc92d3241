//! 内存文档存储
//!
//! [`DocumentStore`] 的内存实现，用于单元/集成测试和本地开发运行。
//! 全部状态置于一把读写锁之下，批量写在一次写锁内整体应用，以此模拟
//! 平台批量写的原子语义。

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{BatchOp, DocumentStore, MAX_BATCH_OPS, WriteBatch};
use crate::error::{CourseError, Result};
use crate::models::{BookingDoc, CourseDoc, NotificationDoc, NotificationRef, UserProfile};

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserProfile>,
    /// 用户档案下的子资源（随行人员等），内容对编排逻辑不透明
    dependents: HashMap<String, Vec<serde_json::Value>>,
    courses: HashMap<String, CourseDoc>,
    /// course_id -> booking_id -> 预约，BTreeMap 保证遍历顺序稳定
    bookings: HashMap<String, BTreeMap<String, BookingDoc>>,
    /// uid -> notification_id -> 通知
    notifications: HashMap<String, BTreeMap<String, NotificationDoc>>,
}

/// 内存文档存储
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 测试/本地数据填充 ====================

    pub fn insert_user(&self, user: UserProfile) {
        self.inner.write().users.insert(user.uid.clone(), user);
    }

    pub fn insert_dependent(&self, uid: &str, dependent: serde_json::Value) {
        self.inner
            .write()
            .dependents
            .entry(uid.to_string())
            .or_default()
            .push(dependent);
    }

    pub fn insert_course(&self, course: CourseDoc) {
        self.inner
            .write()
            .courses
            .insert(course.course_id.clone(), course);
    }

    pub fn insert_booking(&self, booking: BookingDoc) {
        self.inner
            .write()
            .bookings
            .entry(booking.course_id.clone())
            .or_default()
            .insert(booking.booking_id.clone(), booking);
    }

    /// 仅移除课程文档本身，保留子预约。用于模拟触发器送达时
    /// 课程已被外部删除、级联尚未执行的中间状态。
    pub fn remove_course(&self, course_id: &str) {
        self.inner.write().courses.remove(course_id);
    }

    pub fn insert_notification(&self, notification: NotificationDoc) {
        self.inner
            .write()
            .notifications
            .entry(notification.user_id.clone())
            .or_default()
            .insert(notification.notification_id.clone(), notification);
    }

    // ==================== 测试断言辅助 ====================

    pub fn user(&self, uid: &str) -> Option<UserProfile> {
        self.inner.read().users.get(uid).cloned()
    }

    pub fn course(&self, course_id: &str) -> Option<CourseDoc> {
        self.inner.read().courses.get(course_id).cloned()
    }

    pub fn bookings_of(&self, course_id: &str) -> Vec<BookingDoc> {
        self.inner
            .read()
            .bookings
            .get(course_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn notifications_of(&self, uid: &str) -> Vec<NotificationDoc> {
        self.inner
            .read()
            .notifications
            .get(uid)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn dependents_of(&self, uid: &str) -> Vec<serde_json::Value> {
        self.inner
            .read()
            .dependents
            .get(uid)
            .cloned()
            .unwrap_or_default()
    }

    /// 全库通知总数，清理测试用
    pub fn notification_count(&self) -> usize {
        self.inner
            .read()
            .notifications
            .values()
            .map(|m| m.len())
            .sum()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>> {
        Ok(self.inner.read().users.get(uid).cloned())
    }

    async fn set_user_disabled(&self, uid: &str, disabled: bool) -> Result<()> {
        let mut inner = self.inner.write();
        let user = inner
            .users
            .get_mut(uid)
            .ok_or_else(|| CourseError::NotFound {
                entity: "UserProfile".to_string(),
                id: uid.to_string(),
            })?;
        user.is_disabled = disabled;
        Ok(())
    }

    async fn list_admins(&self) -> Result<Vec<UserProfile>> {
        let mut admins: Vec<UserProfile> = self
            .inner
            .read()
            .users
            .values()
            .filter(|u| u.is_admin())
            .cloned()
            .collect();
        admins.sort_by(|a, b| a.uid.cmp(&b.uid));
        Ok(admins)
    }

    async fn delete_user_tree(&self, uid: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.users.remove(uid);
        inner.dependents.remove(uid);
        inner.notifications.remove(uid);
        Ok(())
    }

    async fn add_notification(&self, uid: &str, notification: &NotificationDoc) -> Result<()> {
        self.inner
            .write()
            .notifications
            .entry(uid.to_string())
            .or_default()
            .insert(
                notification.notification_id.clone(),
                notification.clone(),
            );
        Ok(())
    }

    async fn notifications_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<NotificationRef>> {
        let inner = self.inner.read();
        let mut refs: Vec<NotificationRef> = inner
            .notifications
            .values()
            .flat_map(|m| m.values())
            .filter(|n| n.created_at < cutoff)
            .map(|n| NotificationRef {
                user_id: n.user_id.clone(),
                notification_id: n.notification_id.clone(),
            })
            .collect();
        refs.sort_by(|a, b| {
            (&a.user_id, &a.notification_id).cmp(&(&b.user_id, &b.notification_id))
        });
        Ok(refs)
    }

    async fn get_course(&self, course_id: &str) -> Result<Option<CourseDoc>> {
        Ok(self.inner.read().courses.get(course_id).cloned())
    }

    async fn list_bookings(&self, course_id: &str) -> Result<Vec<BookingDoc>> {
        Ok(self.bookings_of(course_id))
    }

    async fn find_bookings_by_user(&self, uid: &str) -> Result<Vec<BookingDoc>> {
        let inner = self.inner.read();
        let mut found: Vec<BookingDoc> = inner
            .bookings
            .values()
            .flat_map(|m| m.values())
            .filter(|b| b.user_id.as_deref() == Some(uid))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.booking_id.cmp(&b.booking_id));
        Ok(found)
    }

    async fn courses_scheduled_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let mut ids: Vec<String> = inner
            .courses
            .values()
            .filter(|c| c.date < cutoff)
            .map(|c| c.course_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete_course_tree(&self, course_id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.courses.remove(course_id);
        inner.bookings.remove(course_id);
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.len() > MAX_BATCH_OPS {
            return Err(CourseError::BatchTooLarge {
                size: batch.len(),
                limit: MAX_BATCH_OPS,
            });
        }

        // 一次写锁内整体应用，模拟平台批量写的原子性。
        // 对已不存在的目标执行删除是幂等成功，与平台行为一致。
        let mut inner = self.inner.write();
        for op in batch.into_ops() {
            match op {
                BatchOp::DeleteBooking {
                    course_id,
                    booking_id,
                } => {
                    if let Some(m) = inner.bookings.get_mut(&course_id) {
                        m.remove(&booking_id);
                    }
                }
                BatchOp::DecrementBookedSpots { course_id, by } => {
                    if let Some(course) = inner.courses.get_mut(&course_id) {
                        course.booked_spots = (course.booked_spots - by).max(0);
                    }
                }
                BatchOp::DeleteNotification {
                    user_id,
                    notification_id,
                } => {
                    if let Some(m) = inner.notifications.get_mut(&user_id) {
                        m.remove(&notification_id);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{course_doc, member};
    use chrono::Duration;

    #[tokio::test]
    async fn test_commit_rejects_oversized_batch() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        for i in 0..(MAX_BATCH_OPS + 1) {
            batch.push(BatchOp::DeleteNotification {
                user_id: "user-1".to_string(),
                notification_id: format!("n-{i}"),
            });
        }

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, CourseError::BatchTooLarge { size, limit }
            if size == MAX_BATCH_OPS + 1 && limit == MAX_BATCH_OPS));
    }

    #[tokio::test]
    async fn test_commit_applies_all_ops_atomically() {
        let store = MemoryStore::new();
        store.insert_course(course_doc("course-1", Utc::now(), 2));
        store.insert_booking(BookingDoc {
            booking_id: "att-1".to_string(),
            course_id: "course-1".to_string(),
            user_id: Some("user-1".to_string()),
            displayed_name: "王小明".to_string(),
        });

        let mut batch = WriteBatch::new();
        batch.push(BatchOp::DeleteBooking {
            course_id: "course-1".to_string(),
            booking_id: "att-1".to_string(),
        });
        batch.push(BatchOp::DecrementBookedSpots {
            course_id: "course-1".to_string(),
            by: 1,
        });
        store.commit(batch).await.unwrap();

        assert!(store.bookings_of("course-1").is_empty());
        assert_eq!(store.course("course-1").unwrap().booked_spots, 1);
    }

    #[tokio::test]
    async fn test_decrement_never_goes_negative() {
        let store = MemoryStore::new();
        store.insert_course(course_doc("course-1", Utc::now(), 0));

        let mut batch = WriteBatch::new();
        batch.push(BatchOp::DecrementBookedSpots {
            course_id: "course-1".to_string(),
            by: 1,
        });
        store.commit(batch).await.unwrap();

        assert_eq!(store.course("course-1").unwrap().booked_spots, 0);
    }

    #[tokio::test]
    async fn test_find_bookings_by_user_spans_courses() {
        let store = MemoryStore::new();
        for course in ["course-1", "course-2"] {
            store.insert_course(course_doc(course, Utc::now(), 1));
            store.insert_booking(BookingDoc {
                booking_id: format!("att-{course}"),
                course_id: course.to_string(),
                user_id: Some("user-1".to_string()),
                displayed_name: "王小明".to_string(),
            });
        }
        store.insert_booking(BookingDoc {
            booking_id: "att-other".to_string(),
            course_id: "course-1".to_string(),
            user_id: Some("user-2".to_string()),
            displayed_name: "李四".to_string(),
        });

        let found = store.find_bookings_by_user("user-1").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|b| b.user_id.as_deref() == Some("user-1")));
    }

    #[tokio::test]
    async fn test_notifications_created_before_cutoff() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let mut old = NotificationDoc::new("user-1", "旧通知", "内容");
        old.created_at = now - Duration::days(15);
        let recent = NotificationDoc::new("user-1", "新通知", "内容");
        store.insert_notification(old.clone());
        store.insert_notification(recent);

        let refs = store
            .notifications_created_before(now - Duration::days(14))
            .await
            .unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].notification_id, old.notification_id);
    }

    #[tokio::test]
    async fn test_delete_user_tree_removes_subresources() {
        let store = MemoryStore::new();
        store.insert_user(member("user-1", None));
        store.insert_dependent("user-1", serde_json::json!({ "name": "小朋友" }));
        store.insert_notification(NotificationDoc::new("user-1", "t", "b"));

        store.delete_user_tree("user-1").await.unwrap();

        assert!(store.user("user-1").is_none());
        assert!(store.dependents_of("user-1").is_empty());
        assert!(store.notifications_of("user-1").is_empty());
    }
}
