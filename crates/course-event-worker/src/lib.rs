//! 课程事件处理器
//!
//! 订阅文档存储的变更事件：课程更新/删除、预约删除，向受影响的
//! 预约人和全体管理员扇出通知。

pub mod booking_events;
pub mod course_events;
pub mod dispatcher;
pub mod format;
