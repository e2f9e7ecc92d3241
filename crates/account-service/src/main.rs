//! 账号服务入口

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use account_service::auth::JwtManager;
use account_service::routes::create_router;
use account_service::state::AppState;
use course_shared::config::AppConfig;
use course_shared::identity::MemoryIdentityProvider;
use course_shared::observability;
use course_shared::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("account-service").context("加载配置失败")?;
    observability::init(&config.observability)?;

    info!(environment = %config.environment, "账号服务启动中");

    // 本地运行时挂接内存实现，部署环境替换为真实提供方
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(MemoryIdentityProvider::new());
    let jwt = JwtManager::new(config.auth.clone());

    let state = AppState::new(store, identity, jwt);
    let app = create_router(state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("监听地址失败: {addr}"))?;
    info!(addr = %addr, "账号服务已就绪");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    info!("账号服务已退出");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "监听退出信号失败");
    }
    info!("收到退出信号，开始优雅关闭");
}
