use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored account. Only successful registration creates one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted by `UserStore::create`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

impl User {
    pub fn new(fields: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: fields.email,
            password_hash: fields.password_hash,
            full_name: fields.full_name,
            created_at: Utc::now(),
        }
    }
}
