use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: i64 },

    /// A profile field whose variant cannot be identified. Recoverable per item.
    #[error("unknown profile field type: {}", .field_type.as_deref().unwrap_or("<missing>"))]
    UnknownVariant { field_type: Option<String> },

    #[error("Profile fields are invalid: {}", .errors.join("; "))]
    InvalidProfileFields { errors: Vec<String> },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn user_not_found(id: i64) -> Self {
        Self::UserNotFound { id }
    }

    pub fn unknown_variant(field_type: Option<String>) -> Self {
        Self::UnknownVariant { field_type }
    }

    pub fn invalid_profile_fields(errors: Vec<String>) -> Self {
        Self::InvalidProfileFields { errors }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
