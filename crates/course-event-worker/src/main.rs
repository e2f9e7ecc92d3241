//! 课程事件处理器入口
//!
//! 事件由托管平台的文档触发器投递，部署适配层负责把触发器回调
//! 绑定到 [`CourseEventReactor`] 与 [`BookingRemovalReactor`]。
//! 本入口用于本地冒烟运行。

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use course_event_worker::booking_events::BookingRemovalReactor;
use course_event_worker::course_events::CourseEventReactor;
use course_event_worker::dispatcher::NotificationDispatcher;
use course_shared::config::AppConfig;
use course_shared::observability;
use course_shared::push::{FcmPushSender, LogPushSender, PushSender};
use course_shared::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("course-event-worker").context("加载配置失败")?;
    observability::init(&config.observability)?;

    let store = Arc::new(MemoryStore::new());
    let push: Arc<dyn PushSender> = if config.push.enabled {
        Arc::new(FcmPushSender::new(&config.push))
    } else {
        Arc::new(LogPushSender)
    };
    let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), push));
    let _course_reactor = CourseEventReactor::new(store.clone(), dispatcher.clone());
    let _booking_reactor = BookingRemovalReactor::new(store, dispatcher);

    info!(environment = %config.environment, "课程事件处理器已就绪，等待触发器投递");

    tokio::signal::ctrl_c().await.context("监听退出信号失败")?;
    info!("课程事件处理器已退出");
    Ok(())
}
