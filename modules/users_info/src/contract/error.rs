use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsersInfoError {
    #[error("User not found: {id}")]
    NotFound { id: i64 },

    #[error("Validation error: {message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("Internal error")]
    Internal,
}

impl UsersInfoError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for UsersInfoError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found(id),
            e @ UnknownVariant { .. } => Self::validation(e.to_string(), vec![e.to_string()]),
            InvalidProfileFields { errors } => {
                Self::validation("Profile fields contain errors", errors)
            }
            Storage { .. } => Self::internal(),
        }
    }
}
