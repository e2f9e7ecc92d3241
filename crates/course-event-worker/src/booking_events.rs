//! 单条预约删除事件处理
//!
//! 管理员从课程中移除某条预约时通知被移除的用户。课程级联删除产生的
//! 预约删除事件在这里识别并压制，避免与课程取消通知重复。

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use course_shared::models::BookingDoc;
use course_shared::store::DocumentStore;

use crate::dispatcher::NotificationDispatcher;
use crate::format::format_date;

/// 预约删除事件处理器
pub struct BookingRemovalReactor {
    store: Arc<dyn DocumentStore>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl BookingRemovalReactor {
    pub fn new(store: Arc<dyn DocumentStore>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// 预约文档删除事件
    #[instrument(skip_all)]
    pub async fn on_attendee_removed(&self, snapshot: Option<&BookingDoc>) {
        let booking = match snapshot {
            Some(booking) => booking,
            None => {
                debug!("删除事件快照为空，忽略");
                return;
            }
        };

        // 父课程已不存在说明这是课程删除的级联，取消通知已由课程路径发出
        let course = match self.store.get_course(&booking.course_id).await {
            Ok(Some(course)) => course,
            Ok(None) => {
                debug!(course_id = %booking.course_id, "父课程已删除，压制重复通知");
                return;
            }
            Err(e) => {
                error!(course_id = %booking.course_id, error = %e, "读取父课程失败");
                return;
            }
        };

        let user_id = match booking.user_id.as_deref() {
            Some(user_id) => user_id,
            None => {
                debug!(booking_id = %booking.booking_id, "预约未关联用户，无人可通知");
                return;
            }
        };

        let body = format!(
            "管理员已将 {} 从 {} 的「{}」中移除",
            booking.displayed_name,
            format_date(course.date),
            course.title,
        );
        self.dispatcher.notify(user_id, "预约已取消", &body).await;
        info!(course_id = %course.course_id, user_id, "预约移除通知已发送");
    }
}
