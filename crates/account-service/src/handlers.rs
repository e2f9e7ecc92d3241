//! HTTP 处理器
//!
//! 处理器只做参数校验与编排，业务规则全部在服务层。

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::dto::{ApiResponse, DeleteUserAccountRequest, ToggleUserStatusRequest};
use crate::error::{AccountError, Result};
use crate::middleware::CallerIdentity;
use crate::state::AppState;

fn required_uid(uid: Option<String>) -> Result<String> {
    match uid {
        Some(uid) if !uid.trim().is_empty() => Ok(uid),
        _ => Err(AccountError::InvalidArgument("uid 不能为空".to_string())),
    }
}

/// 切换账号启用/禁用状态
pub async fn toggle_user_status(
    State(state): State<AppState>,
    Extension(CallerIdentity(caller)): Extension<CallerIdentity>,
    Json(req): Json<ToggleUserStatusRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;
    let uid = required_uid(req.uid)?;

    let message = state
        .account
        .toggle_user_status(caller.as_ref(), &uid)
        .await?;
    Ok(Json(ApiResponse::ok_message(message)))
}

/// 级联删除账号
pub async fn delete_user_account(
    State(state): State<AppState>,
    Extension(CallerIdentity(caller)): Extension<CallerIdentity>,
    Json(req): Json<DeleteUserAccountRequest>,
) -> Result<Json<ApiResponse<()>>> {
    req.validate()?;
    let uid = required_uid(req.uid)?;

    let message = state
        .account
        .delete_user_account(caller.as_ref(), &uid)
        .await?;
    Ok(Json(ApiResponse::ok_message(message)))
}

/// 健康检查
pub async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse::ok_message("ok"))
}
