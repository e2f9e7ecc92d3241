//! 账号管理服务
//!
//! 提供两个需要认证的调用式操作：账号启停切换与账号级联删除。
//! 调用方身份以显式参数传入核心逻辑，HTTP 层只负责解析 Bearer Token。

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;
