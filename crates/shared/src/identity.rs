//! 身份服务抽象
//!
//! 身份提供方（账号启停、账号删除、禁用标志读取）是外部托管系统，
//! 这里只定义编排逻辑消费的接口。内置内存实现供测试和本地运行使用。

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{CourseError, Result};

/// 身份服务中的账号记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAccount {
    pub uid: String,
    pub disabled: bool,
}

/// 身份服务接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_account(&self, uid: &str) -> Result<Option<IdentityAccount>>;
    /// 更新禁用标志；账号不存在视为提供方错误
    async fn set_disabled(&self, uid: &str, disabled: bool) -> Result<()>;
    /// 删除账号记录；账号不存在视为提供方错误
    async fn delete_account(&self, uid: &str) -> Result<()>;
}

/// 内存身份服务
///
/// uid -> disabled 标志。语义对齐托管身份服务：查询缺失返回 None，
/// 而更新/删除缺失账号则报错。
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, bool>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(&self, uid: &str, disabled: bool) {
        self.accounts.write().insert(uid.to_string(), disabled);
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.accounts.read().contains_key(uid)
    }

    pub fn disabled(&self, uid: &str) -> Option<bool> {
        self.accounts.read().get(uid).copied()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn get_account(&self, uid: &str) -> Result<Option<IdentityAccount>> {
        Ok(self.accounts.read().get(uid).map(|&disabled| IdentityAccount {
            uid: uid.to_string(),
            disabled,
        }))
    }

    async fn set_disabled(&self, uid: &str, disabled: bool) -> Result<()> {
        let mut accounts = self.accounts.write();
        match accounts.get_mut(uid) {
            Some(flag) => {
                *flag = disabled;
                Ok(())
            }
            None => Err(CourseError::Identity(format!("账号不存在: {uid}"))),
        }
    }

    async fn delete_account(&self, uid: &str) -> Result<()> {
        if self.accounts.write().remove(uid).is_none() {
            return Err(CourseError::Identity(format!("账号不存在: {uid}")));
        }
        Ok(())
    }
}
