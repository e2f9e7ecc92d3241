//! 单用户通知分发
//!
//! 写入通知记录并在用户注册了推送 Token 时投递推送。任何失败都在
//! 这里吞掉并记日志：扇出调用方不能因为个别收件人不可达而中断。

use std::sync::Arc;

use tracing::{debug, warn};

use course_shared::models::NotificationDoc;
use course_shared::push::{PushMessage, PushSender};
use course_shared::store::DocumentStore;

/// 客户端收到推送后跳转的页面
pub const ROUTE_NOTIFICATIONS: &str = "notifications";

/// 通知分发器
pub struct NotificationDispatcher {
    store: Arc<dyn DocumentStore>,
    push: Arc<dyn PushSender>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn DocumentStore>, push: Arc<dyn PushSender>) -> Self {
        Self { store, push }
    }

    /// 给单个用户发一条通知
    ///
    /// 用户不存在时静默跳过；记录写入失败和推送失败都只记日志。
    pub async fn notify(&self, user_id: &str, title: &str, body: &str) {
        let user = match self.store.get_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(user_id, "用户不存在，跳过通知");
                return;
            }
            Err(e) => {
                warn!(user_id, error = %e, "读取用户失败，跳过通知");
                return;
            }
        };

        let doc = NotificationDoc::new(user_id, title, body);
        if let Err(e) = self.store.add_notification(user_id, &doc).await {
            warn!(user_id, error = %e, "通知记录写入失败");
            return;
        }

        if let Some(token) = user.fcm_token.as_deref() {
            let message = PushMessage {
                title: title.to_string(),
                body: body.to_string(),
                route: ROUTE_NOTIFICATIONS.to_string(),
            };
            if let Err(e) = self.push.send(token, &message).await {
                warn!(user_id, error = %e, "推送投递失败，通知记录已保留");
            }
        } else {
            debug!(user_id, "用户未注册推送 Token，仅写入通知记录");
        }
    }
}
