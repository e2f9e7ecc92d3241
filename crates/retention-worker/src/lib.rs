//! 保留期清理任务
//!
//! 按日清理超过保留期的历史课程和过期通知。

pub mod sweeper;
