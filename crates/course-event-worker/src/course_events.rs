//! 课程变更/删除事件处理
//!
//! 课程时间变更时通知全部预约人和管理员；课程被删除时清理子预约，
//! 并在课程尚未开课的情况下通知相关人等。事件处理没有调用方可以
//! 汇报，所有失败就地记日志吸收。

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, instrument};

use course_shared::models::{BookingDoc, CourseDoc, UserProfile};
use course_shared::store::{BatchOp, DocumentStore, WriteBatch};

use crate::dispatcher::NotificationDispatcher;
use crate::format::{format_date, format_datetime};

/// 课程事件处理器
pub struct CourseEventReactor {
    store: Arc<dyn DocumentStore>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl CourseEventReactor {
    pub fn new(store: Arc<dyn DocumentStore>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// 课程文档更新事件
    ///
    /// 仅时间戳精确变化才触发扇出，其余字段变更一律忽略。
    #[instrument(skip_all, fields(course_id = %after.course_id))]
    pub async fn on_course_updated(&self, before: &CourseDoc, after: &CourseDoc) {
        if before.date == after.date {
            debug!("上课时间未变化，忽略");
            return;
        }

        let (bookings, admins) = match self.load_recipients(&after.course_id).await {
            Some(pair) => pair,
            None => return,
        };

        let title = "课程时间变更";
        let body = format!(
            "「{}」的上课时间由 {} 调整为 {}",
            after.title,
            format_datetime(before.date),
            format_datetime(after.date),
        );

        let count = self.fan_out(&bookings, &admins, title, &body).await;
        info!(count, "时间变更通知扇出完成");
    }

    /// 课程文档删除事件
    ///
    /// 快照为空时不做任何事。已开课的历史课程只清理子预约、不发通知；
    /// 未开课的课程在清理子预约的同时并发通知预约人与管理员。
    #[instrument(skip_all)]
    pub async fn on_course_deleted(&self, snapshot: Option<&CourseDoc>) {
        let course = match snapshot {
            Some(course) => course,
            None => {
                debug!("删除事件快照为空，忽略");
                return;
            }
        };

        let bookings = match self.store.list_bookings(&course.course_id).await {
            Ok(bookings) => bookings,
            Err(e) => {
                error!(course_id = %course.course_id, error = %e, "读取课程预约失败");
                return;
            }
        };

        let already_held = course.date < chrono::Utc::now();
        if already_held {
            // 过期课程的删除属于例行清理，不打扰任何人
            self.delete_bookings(&course.course_id, &bookings).await;
            info!(course_id = %course.course_id, "历史课程已清理，未发送通知");
            return;
        }

        let admins = match self.store.list_admins().await {
            Ok(admins) => admins,
            Err(e) => {
                error!(error = %e, "读取管理员列表失败");
                return;
            }
        };

        let title = "课程取消";
        let body = format!("{} 的「{}」已取消", format_date(course.date), course.title);

        // 通知扇出与子预约删除并发执行，二者都完成后事件才算处理完
        let (count, ()) = tokio::join!(
            self.fan_out(&bookings, &admins, title, &body),
            self.delete_bookings(&course.course_id, &bookings),
        );
        info!(course_id = %course.course_id, count, "课程取消通知扇出完成");
    }

    async fn load_recipients(
        &self,
        course_id: &str,
    ) -> Option<(Vec<BookingDoc>, Vec<UserProfile>)> {
        let bookings = match self.store.list_bookings(course_id).await {
            Ok(bookings) => bookings,
            Err(e) => {
                error!(course_id, error = %e, "读取课程预约失败");
                return None;
            }
        };
        let admins = match self.store.list_admins().await {
            Ok(admins) => admins,
            Err(e) => {
                error!(error = %e, "读取管理员列表失败");
                return None;
            }
        };
        Some((bookings, admins))
    }

    /// 并发通知全部预约人（跳过无 userId 的代订预约）和全部管理员
    async fn fan_out(
        &self,
        bookings: &[BookingDoc],
        admins: &[UserProfile],
        title: &str,
        body: &str,
    ) -> usize {
        let recipients: Vec<&str> = bookings
            .iter()
            .filter_map(|b| b.user_id.as_deref())
            .chain(admins.iter().map(|a| a.uid.as_str()))
            .collect();

        join_all(
            recipients
                .iter()
                .map(|uid| self.dispatcher.notify(uid, title, body)),
        )
        .await;
        recipients.len()
    }

    async fn delete_bookings(&self, course_id: &str, bookings: &[BookingDoc]) {
        if bookings.is_empty() {
            return;
        }
        let mut batch = WriteBatch::new();
        for booking in bookings {
            batch.push(BatchOp::DeleteBooking {
                course_id: course_id.to_string(),
                booking_id: booking.booking_id.clone(),
            });
        }
        if let Err(e) = self.store.commit(batch).await {
            error!(course_id, error = %e, "子预约批量删除失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_shared::store::MemoryStore;
    use course_shared::test_utils::{
        RecordingPushSender, admin, booking_doc, course_doc, days_ago, days_ahead, member,
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        reactor: CourseEventReactor,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            Arc::new(RecordingPushSender::new()),
        ));
        let reactor = CourseEventReactor::new(store.clone(), dispatcher);
        Fixture { store, reactor }
    }

    /// 2 个有 userId 的预约 + 1 个代订 + 2 个管理员
    fn seed_course(f: &Fixture, course_id: &str, date: chrono::DateTime<chrono::Utc>) {
        f.store.insert_course(course_doc(course_id, date, 3));
        f.store.insert_user(member("user-1", Some("tok-1")));
        f.store.insert_user(member("user-2", None));
        f.store.insert_user(admin("admin-1"));
        f.store.insert_user(admin("admin-2"));
        f.store
            .insert_booking(booking_doc(course_id, "att-1", Some("user-1")));
        f.store
            .insert_booking(booking_doc(course_id, "att-2", Some("user-2")));
        f.store.insert_booking(booking_doc(course_id, "att-3", None));
    }

    #[tokio::test]
    async fn test_unchanged_date_is_noop() {
        let f = fixture();
        seed_course(&f, "course-1", days_ahead(3));
        let course = f.store.course("course-1").unwrap();

        f.reactor.on_course_updated(&course, &course).await;

        assert_eq!(f.store.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_date_change_notifies_holders_and_admins() {
        let f = fixture();
        seed_course(&f, "course-1", days_ahead(3));
        let before = f.store.course("course-1").unwrap();
        let mut after = before.clone();
        after.date = days_ahead(5);

        f.reactor.on_course_updated(&before, &after).await;

        // 2 个预约人 + 2 个管理员，代订预约不产生通知
        assert_eq!(f.store.notification_count(), 4);
        assert_eq!(f.store.notifications_of("user-1").len(), 1);
        assert_eq!(f.store.notifications_of("user-2").len(), 1);
        assert_eq!(f.store.notifications_of("admin-1").len(), 1);
        let n = &f.store.notifications_of("user-1")[0];
        assert_eq!(n.title, "课程时间变更");
    }

    #[tokio::test]
    async fn test_dangling_user_id_tolerated_in_fan_out() {
        let f = fixture();
        f.store.insert_course(course_doc("course-1", days_ahead(3), 1));
        f.store.insert_user(admin("admin-1"));
        // 预约引用的用户已不存在
        f.store
            .insert_booking(booking_doc("course-1", "att-1", Some("ghost")));
        let before = f.store.course("course-1").unwrap();
        let mut after = before.clone();
        after.date = days_ahead(4);

        f.reactor.on_course_updated(&before, &after).await;

        // 悬挂引用静默跳过，管理员仍收到通知
        assert_eq!(f.store.notification_count(), 1);
        assert_eq!(f.store.notifications_of("admin-1").len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_past_course_is_silent_cleanup() {
        let f = fixture();
        seed_course(&f, "course-1", days_ago(2));
        let course = f.store.course("course-1").unwrap();

        f.reactor.on_course_deleted(Some(&course)).await;

        assert!(f.store.bookings_of("course-1").is_empty());
        assert_eq!(f.store.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_deleting_future_course_notifies_and_cleans() {
        let f = fixture();
        seed_course(&f, "course-1", days_ahead(2));
        let course = f.store.course("course-1").unwrap();

        f.reactor.on_course_deleted(Some(&course)).await;

        assert!(f.store.bookings_of("course-1").is_empty());
        assert_eq!(f.store.notification_count(), 4);
        let n = &f.store.notifications_of("user-1")[0];
        assert_eq!(n.title, "课程取消");
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_noop() {
        let f = fixture();
        f.reactor.on_course_deleted(None).await;
        assert_eq!(f.store.notification_count(), 0);
    }
}
