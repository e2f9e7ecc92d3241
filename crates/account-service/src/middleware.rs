//! JWT 认证中间件
//!
//! 从 Authorization header 中提取 Bearer Token，验证通过后将 Claims
//! 注入请求扩展。调用方身份是核心逻辑的显式参数，因此中间件本身
//! 从不拒绝请求：缺失或无效的 Token 注入 `None`，由服务层统一返回
//! 未认证错误。

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::Claims;
use crate::state::AppState;

/// 请求扩展中的调用方身份
#[derive(Clone)]
pub struct CallerIdentity(pub Option<Claims>);

/// 认证中间件
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let claims = match token {
        Some(token) => match state.jwt.verify_token(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!(error = %e, "Bearer Token 验证失败，按未认证处理");
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(CallerIdentity(claims));
    next.run(request).await
}
