//! 保留期清理
//!
//! 每日按 cron 计划执行一次：删除上课时间早于保留期的课程（连同子
//! 预约），以及创建时间早于同一界限的通知。单次执行内的失败全部
//! 记日志吸收，调度循环不会因为某次清理失败而终止。

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use cron::Schedule;
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use course_shared::config::RetentionConfig;
use course_shared::store::{BatchOp, DocumentStore, MAX_BATCH_OPS, WriteBatch};

/// 保留期清理任务
pub struct RetentionSweeper {
    store: Arc<dyn DocumentStore>,
    retention_days: i64,
    cron: String,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn DocumentStore>, config: &RetentionConfig) -> Self {
        Self {
            store,
            retention_days: config.retention_days,
            cron: config.cron.clone(),
        }
    }

    /// 按 cron 计划循环执行清理
    ///
    /// cron 表达式不合法时返回错误；之后循环永不退出。
    pub async fn run(&self) -> anyhow::Result<()> {
        let schedule = Schedule::from_str(&self.cron)
            .map_err(|e| anyhow::anyhow!("cron 表达式不合法 {:?}: {e}", self.cron))?;
        info!(cron = %self.cron, retention_days = self.retention_days, "保留期清理任务已启动");

        loop {
            let next = match schedule.upcoming(Utc).next() {
                Some(next) => next,
                None => {
                    warn!(cron = %self.cron, "cron 计划没有下一次执行时间，任务退出");
                    return Ok(());
                }
            };
            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            info!(next = %next, "等待下一次清理");
            tokio::time::sleep(wait).await;

            self.cleanup().await;
        }
    }

    /// 执行一轮清理
    ///
    /// 永不上抛错误：对调度方而言每次执行都视为成功完成。
    #[instrument(skip(self))]
    pub async fn cleanup(&self) {
        let horizon = Utc::now() - Duration::days(self.retention_days);
        info!(horizon = %horizon, "开始保留期清理");

        self.sweep_courses(horizon).await;
        self.sweep_notifications(horizon).await;

        info!("保留期清理完成");
    }

    /// 删除上课时间早于界限的课程，连同全部子预约；各课程并发删除
    async fn sweep_courses(&self, horizon: DateTime<Utc>) {
        let course_ids = match self.store.courses_scheduled_before(horizon).await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "查询过期课程失败，本轮跳过课程清理");
                return;
            }
        };
        if course_ids.is_empty() {
            info!("没有超过保留期的课程");
            return;
        }

        let results = join_all(course_ids.iter().map(|course_id| async move {
            self.store
                .delete_course_tree(course_id)
                .await
                .map_err(|e| (course_id.clone(), e))
        }))
        .await;

        let mut deleted = 0usize;
        for result in results {
            match result {
                Ok(()) => deleted += 1,
                Err((course_id, e)) => error!(course_id = %course_id, error = %e, "课程删除失败"),
            }
        }
        info!(total = course_ids.len(), deleted, "过期课程清理完成");
    }

    /// 删除创建时间早于界限的通知，按平台批量上限分批并发提交
    async fn sweep_notifications(&self, horizon: DateTime<Utc>) {
        let refs = match self.store.notifications_created_before(horizon).await {
            Ok(refs) => refs,
            Err(e) => {
                error!(error = %e, "查询过期通知失败，本轮跳过通知清理");
                return;
            }
        };
        if refs.is_empty() {
            info!("没有超过保留期的通知");
            return;
        }

        let batches: Vec<WriteBatch> = refs
            .chunks(MAX_BATCH_OPS)
            .map(|chunk| {
                let mut batch = WriteBatch::new();
                for r in chunk {
                    batch.push(BatchOp::DeleteNotification {
                        user_id: r.user_id.clone(),
                        notification_id: r.notification_id.clone(),
                    });
                }
                batch
            })
            .collect();
        let batch_count = batches.len();

        let results = join_all(batches.into_iter().map(|batch| self.store.commit(batch))).await;
        let failed = results.iter().filter(|r| r.is_err()).count();
        for result in results {
            if let Err(e) = result {
                error!(error = %e, "通知批量删除失败");
            }
        }
        info!(
            total = refs.len(),
            batch_count, failed, "过期通知清理完成"
        );
    }
}
