use std::sync::Arc;

use crate::contract::model::{NewUser, ProfileField, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::profile;
use crate::domain::repo::{NewUserRecord, UsersRepository};
use chrono::Utc;
use tracing::{debug, info, instrument};

/// Domain service with business rules for user management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_profile_fields: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_profile_fields: 100,
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "users_info.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self
            .repo
            .list()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        let stats = profile::field_name_stats(&users);
        if !stats.is_empty() {
            info!(?stats, "profile field name statistics");
        }

        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "users_info.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(
        name = "users_info.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email, name = %new_user.name)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        match new_user.profile_fields.as_deref() {
            Some(fields) => {
                debug!(count = fields.len(), "profile fields received");
                profile::log_field_names(fields);
                self.validate_profile_fields(fields)?;
            }
            None => debug!("no profile fields received"),
        }

        let now = Utc::now();
        let user = self
            .repo
            .insert(NewUserRecord {
                name: new_user.name,
                email: new_user.email,
                created_at: now,
                updated_at: now,
                profile_fields: new_user.profile_fields,
            })
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "users_info.service.update_user", skip(self, patch), fields(user_id = id))]
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        if let Some(fields) = patch.profile_fields.as_deref() {
            profile::log_field_names(fields);
            self.validate_profile_fields(fields)?;
        }

        let mut current = self.get_user(id).await?;

        if let Some(name) = patch.name {
            current.name = name;
        }
        if let Some(email) = patch.email {
            current.email = email;
        }
        if let Some(fields) = patch.profile_fields {
            current.profile_fields = Some(fields);
        }
        current.updated_at = Utc::now();

        let stored = self
            .repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        if !stored {
            // removed between the read and the write
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully updated user");
        Ok(current)
    }

    #[instrument(name = "users_info.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting user");

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    // --- validation helpers ---

    fn validate_profile_fields(&self, fields: &[ProfileField]) -> Result<(), DomainError> {
        let mut errors = Vec::new();
        if fields.len() > self.config.max_profile_fields {
            errors.push(format!(
                "too many profile fields: {} (max: {})",
                fields.len(),
                self.config.max_profile_fields
            ));
        }
        errors.extend(profile::validate_names(fields));

        if errors.is_empty() {
            return Ok(());
        }
        debug!(?errors, "profile field validation failed");
        Err(DomainError::invalid_profile_fields(errors))
    }
}
