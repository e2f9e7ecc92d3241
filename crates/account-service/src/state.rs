//! 应用状态

use std::sync::Arc;

use course_shared::identity::IdentityProvider;
use course_shared::store::DocumentStore;

use crate::auth::JwtManager;
use crate::service::AccountService;

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub account: Arc<AccountService>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        jwt: JwtManager,
    ) -> Self {
        Self {
            account: Arc::new(AccountService::new(store, identity)),
            jwt: Arc::new(jwt),
        }
    }
}
