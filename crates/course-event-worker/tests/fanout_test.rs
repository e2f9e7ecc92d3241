//! 课程事件端到端扇出测试
//!
//! 模拟平台触发器的真实投递顺序：课程删除事件之后，每条被级联删除的
//! 预约还会各收到一次预约删除事件。

use std::sync::Arc;

use course_event_worker::booking_events::BookingRemovalReactor;
use course_event_worker::course_events::CourseEventReactor;
use course_event_worker::dispatcher::NotificationDispatcher;
use course_shared::store::MemoryStore;
use course_shared::test_utils::{
    RecordingPushSender, admin, booking_doc, course_doc, days_ahead, member,
};

struct Harness {
    store: Arc<MemoryStore>,
    push: Arc<RecordingPushSender>,
    course_reactor: CourseEventReactor,
    booking_reactor: BookingRemovalReactor,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let push = Arc::new(RecordingPushSender::new());
    let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), push.clone()));
    Harness {
        store: store.clone(),
        push: push.clone(),
        course_reactor: CourseEventReactor::new(store.clone(), dispatcher.clone()),
        booking_reactor: BookingRemovalReactor::new(store, dispatcher),
    }
}

#[tokio::test]
async fn test_course_cancellation_does_not_double_notify() {
    let h = harness();
    h.store.insert_user(member("user-1", Some("tok-1")));
    h.store.insert_user(admin("admin-1"));
    h.store
        .insert_course(course_doc("course-1", days_ahead(3), 1));
    let booking = booking_doc("course-1", "att-1", Some("user-1"));
    h.store.insert_booking(booking.clone());

    // 管理端删除课程：课程文档先消失，随后触发课程删除事件
    let course = h.store.course("course-1").unwrap();
    h.store.remove_course("course-1");
    h.course_reactor.on_course_deleted(Some(&course)).await;

    assert_eq!(h.store.notifications_of("user-1").len(), 1);
    assert_eq!(h.store.notifications_of("admin-1").len(), 1);

    // 平台随后为每条被级联删除的预约投递一次删除事件，必须压制
    h.booking_reactor.on_attendee_removed(Some(&booking)).await;

    assert_eq!(h.store.notifications_of("user-1").len(), 1);
    // 注册了推送 Token 的用户恰好收到一次推送
    assert_eq!(h.push.sent_count(), 1);
    assert_eq!(h.push.sent()[0].0, "tok-1");
}

#[tokio::test]
async fn test_direct_removal_notifies_exactly_once() {
    let h = harness();
    h.store.insert_user(member("user-1", Some("tok-1")));
    h.store
        .insert_course(course_doc("course-1", days_ahead(3), 1));
    let booking = booking_doc("course-1", "att-1", Some("user-1"));

    h.booking_reactor.on_attendee_removed(Some(&booking)).await;

    let notifications = h.store.notifications_of("user-1");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "预约已取消");
    assert_eq!(h.push.sent_count(), 1);
}

#[tokio::test]
async fn test_push_outage_does_not_abort_fan_out() {
    let store = Arc::new(MemoryStore::new());
    let push = Arc::new(RecordingPushSender::failing());
    let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), push));
    let reactor = CourseEventReactor::new(store.clone(), dispatcher);

    store.insert_user(member("user-1", Some("tok-1")));
    store.insert_user(member("user-2", Some("tok-2")));
    store.insert_course(course_doc("course-1", days_ahead(2), 2));
    store.insert_booking(booking_doc("course-1", "att-1", Some("user-1")));
    store.insert_booking(booking_doc("course-1", "att-2", Some("user-2")));

    let before = store.course("course-1").unwrap();
    let mut after = before.clone();
    after.date = days_ahead(4);
    reactor.on_course_updated(&before, &after).await;

    // 推送全挂，通知记录仍然全部写入
    assert_eq!(store.notifications_of("user-1").len(), 1);
    assert_eq!(store.notifications_of("user-2").len(), 1);
}
