use modkit::api::error::{bad_request, internal_error, not_found};
use modkit::ErrorResponse;

use crate::domain::error::DomainError;

pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Map a domain error to the `{message, code}` response the REST API returns.
pub fn map_domain_error(e: &DomainError) -> ErrorResponse {
    match e {
        DomainError::UserNotFound { .. } => not_found(USER_NOT_FOUND, "User not found"),
        DomainError::InvalidProfileFields { errors } => bad_request(
            VALIDATION_ERROR,
            format!("Profile fields contain errors: {}", errors.join("; ")),
        ),
        DomainError::UnknownVariant { .. } => bad_request(
            VALIDATION_ERROR,
            format!("Profile fields contain errors: {e}"),
        ),
        DomainError::Storage { message } => {
            tracing::error!(error = %message, "storage failure");
            internal_error("Internal server error")
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(e: DomainError) -> Self {
        map_domain_error(&e)
    }
}
