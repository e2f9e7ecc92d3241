//! 共享库
//!
//! 课程预约后端各服务共用的配置、错误处理、数据模型，以及三个外部协作方的
//! 抽象接口（文档存储、身份服务、推送通道）。业务编排逻辑全部依赖这里的
//! trait 而非具体实现，便于 mock 测试和替换托管平台的适配器。

pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod observability;
pub mod push;
pub mod store;
pub mod test_utils;
