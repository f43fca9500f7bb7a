//! In-memory implementation of the `UsersRepository` port.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::contract::model::User;
use crate::domain::repo::{NewUserRecord, UsersRepository};
use crate::infra::storage::sample_data::sample_users;

#[derive(Debug)]
struct Inner {
    users: Vec<User>,
    next_id: i64,
}

/// Ordered user list plus an id counter behind a single lock.
///
/// Ids are handed out monotonically and never reused, even after a delete.
#[derive(Debug)]
pub struct InMemoryUsersRepository {
    inner: RwLock<Inner>,
}

impl InMemoryUsersRepository {
    /// Empty store; the first insert gets id 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Store pre-populated with `users`; `next_id` continues after the largest id.
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(Inner { users, next_id }),
        }
    }

    /// Store holding the sample users (ids 1 and 2).
    pub fn seeded() -> Self {
        Self::with_users(sample_users(Utc::now()))
    }

    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryUsersRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.inner.read().users.clone())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let inner = self.inner.read();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User> {
        let mut inner = self.inner.write();
        let user = User {
            id: inner.next_id,
            name: record.name,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
            profile_fields: record.profile_fields,
        };
        inner.next_id += 1;
        inner.users.push(user.clone());
        tracing::debug!(id = user.id, total = inner.users.len(), "user stored");
        Ok(user)
    }

    async fn update(&self, u: User) -> anyhow::Result<bool> {
        let mut inner = self.inner.write();
        match inner.users.iter_mut().find(|existing| existing.id == u.id) {
            Some(slot) => {
                *slot = u;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut inner = self.inner.write();
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        let removed = inner.users.len() != before;
        if removed {
            tracing::debug!(id, total = inner.users.len(), "user removed");
        }
        Ok(removed)
    }
}
