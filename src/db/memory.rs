use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{NewUser, User, UserStore};
use crate::error::StoreError;

/// Process-local store keyed by e-mail, used for tests and the `memory` backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, fields: NewUser) -> Result<User, StoreError> {
        Ok(User::new(fields))
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        // Check and insert under one write lock so concurrent saves cannot both win.
        if users.contains_key(&user.email) {
            return Err(StoreError::Duplicate);
        }

        debug!("Saved user {} in memory store", user.id);
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }
}
