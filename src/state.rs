//! Shared application state

use crate::auth::JwtHandler;
use crate::users::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStore,
    pub jwt_handler: Arc<JwtHandler>,
    /// bcrypt work factor for new digests
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(user_store: UserStore, jwt_handler: JwtHandler, bcrypt_cost: u32) -> Self {
        Self {
            user_store,
            jwt_handler: Arc::new(jwt_handler),
            bcrypt_cost,
        }
    }
}
