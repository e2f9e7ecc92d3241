//! 保留期清理任务入口

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use course_shared::config::AppConfig;
use course_shared::observability;
use course_shared::store::MemoryStore;
use retention_worker::sweeper::RetentionSweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("retention-worker").context("加载配置失败")?;
    observability::init(&config.observability)?;

    info!(environment = %config.environment, "保留期清理任务启动中");

    // 本地运行时挂接内存实现，部署环境替换为真实存储适配器
    let store = Arc::new(MemoryStore::new());
    let sweeper = RetentionSweeper::new(store, &config.retention);

    tokio::select! {
        result = sweeper.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("收到退出信号，保留期清理任务退出");
            Ok(())
        }
    }
}
