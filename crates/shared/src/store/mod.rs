//! 文档存储抽象
//!
//! 定义业务编排对托管文档数据库的全部诉求，便于服务层依赖抽象而非具体
//! 实现，支持 mock 测试。真实部署中由平台适配器实现；本仓库内置一个
//! 内存实现（[`MemoryStore`]）供测试和本地运行使用。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{BookingDoc, CourseDoc, NotificationDoc, NotificationRef, UserProfile};

mod memory;

pub use memory::MemoryStore;

/// 存储层单个原子批次允许的最大操作数（平台硬限制）
pub const MAX_BATCH_OPS: usize = 500;

/// 批量写中的单个操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// 删除一条预约
    DeleteBooking {
        course_id: String,
        booking_id: String,
    },
    /// 将课程的已预约计数减少 `by`
    DecrementBookedSpots { course_id: String, by: i32 },
    /// 删除一条通知
    DeleteNotification {
        user_id: String,
        notification_id: String,
    },
}

/// 原子批量写
///
/// 整个批次要么全部提交、要么全部失败，不存在部分可见的中间态。
/// 操作数上限由 [`MAX_BATCH_OPS`] 约束，在提交时校验。
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: BatchOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// 文档存储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // 用户
    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>>;
    async fn set_user_disabled(&self, uid: &str, disabled: bool) -> Result<()>;
    async fn list_admins(&self) -> Result<Vec<UserProfile>>;
    /// 递归删除用户档案及其全部子资源（随行人员、通知等）
    async fn delete_user_tree(&self, uid: &str) -> Result<()>;

    // 通知
    async fn add_notification(&self, uid: &str, notification: &NotificationDoc) -> Result<()>;
    /// 跨全部用户查找创建时间早于 `cutoff` 的通知
    async fn notifications_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<NotificationRef>>;

    // 课程与预约
    async fn get_course(&self, course_id: &str) -> Result<Option<CourseDoc>>;
    async fn list_bookings(&self, course_id: &str) -> Result<Vec<BookingDoc>>;
    /// 跨全部课程查找某用户的预约（集合组查询）
    async fn find_bookings_by_user(&self, uid: &str) -> Result<Vec<BookingDoc>>;
    /// 查找上课时间早于 `cutoff` 的课程 ID
    async fn courses_scheduled_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>>;
    /// 递归删除课程及其全部预约
    async fn delete_course_tree(&self, course_id: &str) -> Result<()>;

    /// 原子提交一个批量写
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::member;

    #[tokio::test]
    async fn test_mock_store_expectations() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_user()
            .withf(|uid| uid == "user-1")
            .returning(|uid| Ok(Some(member(uid, None))));

        let user = store.get_user("user-1").await.unwrap().unwrap();
        assert_eq!(user.uid, "user-1");
    }

    #[test]
    fn test_write_batch_accumulates_ops() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());

        batch.push(BatchOp::DeleteBooking {
            course_id: "course-1".to_string(),
            booking_id: "att-1".to_string(),
        });
        batch.push(BatchOp::DecrementBookedSpots {
            course_id: "course-1".to_string(),
            by: 1,
        });

        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(
            batch.ops()[1],
            BatchOp::DecrementBookedSpots {
                course_id: "course-1".to_string(),
                by: 1,
            }
        );
    }
}
