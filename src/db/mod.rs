//! User store collaborator
//!
//! The authentication pipeline only needs three operations from storage:
//! look an account up by e-mail, build an unsaved record and persist it.
//! Every backend must reject a second record for an e-mail on `save`;
//! the pipeline's own duplicate check is advisory.

pub mod memory;
pub mod models;
pub mod operations;

use async_trait::async_trait;

use crate::error::StoreError;

pub use memory::InMemoryUserStore;
pub use models::{NewUser, User};
pub use operations::PgUserStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Builds a record from `fields` without persisting it.
    async fn create(&self, fields: NewUser) -> Result<User, StoreError>;

    async fn save(&self, user: User) -> Result<User, StoreError>;
}
