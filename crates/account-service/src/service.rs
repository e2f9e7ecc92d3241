//! 账号生命周期核心逻辑
//!
//! 启停切换在身份服务与档案库之间同步禁用标志；级联删除按固定顺序
//! 清理档案树、散落各课程的预约（含计数器回补）和身份记录。级联是
//! 尽力而为的单向流程：后续步骤失败不会回滚已完成的步骤。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use course_shared::identity::IdentityProvider;
use course_shared::store::{BatchOp, DocumentStore, WriteBatch};

use crate::auth::Claims;
use crate::error::{AccountError, Result};

/// 账号生命周期服务
pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl AccountService {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// 调用式操作的共同前置检查：已认证且 uid 非空
    fn check_call<'a>(caller: Option<&Claims>, uid: &'a str) -> Result<&'a str> {
        if caller.is_none() {
            return Err(AccountError::Unauthenticated);
        }
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(AccountError::InvalidArgument("uid 不能为空".to_string()));
        }
        Ok(uid)
    }

    /// 切换账号的启用/禁用状态
    ///
    /// 读取身份服务中的禁用标志并取反，先写回身份服务，再镜像到档案库。
    /// 两次写之间没有跨系统事务，短暂漂移由下一次切换自然纠正。
    #[instrument(skip(self, caller), fields(uid = %uid))]
    pub async fn toggle_user_status(
        &self,
        caller: Option<&Claims>,
        uid: &str,
    ) -> Result<String> {
        let uid = Self::check_call(caller, uid)?;

        let account = self
            .identity
            .get_account(uid)
            .await?
            .ok_or_else(|| AccountError::Internal(format!("身份记录不存在: {uid}")))?;

        let was_disabled = account.disabled;
        let now_disabled = !was_disabled;

        self.identity.set_disabled(uid, now_disabled).await?;
        self.store.set_user_disabled(uid, now_disabled).await?;

        info!(was_disabled, now_disabled, "账号状态已切换");

        // 历史客户端依赖该文案描述切换前的状态，保持不变
        let message = if was_disabled {
            "用户已禁用".to_string()
        } else {
            "用户已启用".to_string()
        };
        Ok(message)
    }

    /// 级联删除账号及其全部数据
    ///
    /// 三个独立的失败域，按序执行：
    /// 1. 递归删除档案树（档案、随行人员、通知）
    /// 2. 跨课程查找该用户的预约，单个原子批次内逐条删除并回补课程计数
    /// 3. 删除身份记录
    #[instrument(skip(self, caller), fields(uid = %uid))]
    pub async fn delete_user_account(
        &self,
        caller: Option<&Claims>,
        uid: &str,
    ) -> Result<String> {
        let uid = Self::check_call(caller, uid)?;

        self.store.delete_user_tree(uid).await?;
        info!("档案树已删除");

        let bookings = self.store.find_bookings_by_user(uid).await?;
        if bookings.is_empty() {
            info!("该账号没有散落的预约");
        } else {
            let mut batch = WriteBatch::new();
            for booking in &bookings {
                batch.push(BatchOp::DeleteBooking {
                    course_id: booking.course_id.clone(),
                    booking_id: booking.booking_id.clone(),
                });
                // 每删一条预约，父课程计数同批回补一次
                batch.push(BatchOp::DecrementBookedSpots {
                    course_id: booking.course_id.clone(),
                    by: 1,
                });
            }
            let op_count = batch.len();
            self.store.commit(batch).await?;
            info!(
                booking_count = bookings.len(),
                op_count, "散落预约已批量删除并回补计数"
            );
        }

        if let Err(e) = self.identity.delete_account(uid).await {
            // 前两步已生效且不回滚；此处失败仍需调用方感知
            warn!(error = %e, "身份记录删除失败，档案与预约已清理");
            return Err(e.into());
        }
        info!("身份记录已删除");

        Ok("账号已永久删除".to_string())
    }
}
