use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{ProfileField, User};

/// A user as the service hands it to the store: everything except the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile_fields: Option<Vec<ProfileField>>,
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// All users in insertion order.
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    /// Load a user by id.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// Persist a new user. The store assigns the id.
    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User>;
    /// Replace an existing user (matched by `u.id`). Returns false if it is gone.
    async fn update(&self, u: User) -> anyhow::Result<bool>;
    /// Delete by id. Returns true if a user was removed.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}
