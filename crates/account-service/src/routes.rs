//! 路由配置

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// 构建应用路由
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/account/toggle-status", post(handlers::toggle_user_status))
        .route("/api/account/delete", post(handlers::delete_user_account))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
