//! Global application error types and handlers.
//!
//! This module defines the error taxonomy used across the entire backend and
//! provides mechanisms for consistent error handling and response formatting.

use thiserror::Error;

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        /// Set only for a validly-signed but expired access token, so the
        /// transport layer can emit a refresh-triggering signal.
        token_expired: bool,
    },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("{entity} already exists: {identifier}")]
    Conflict { entity: String, identifier: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("Internal error: {source}")]
    Internal {
        #[from]
        source: anyhow::Error,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            token_expired: false,
        }
    }

    pub fn token_expired() -> Self {
        Self::Unauthorized {
            message: "token expired".to_string(),
            token_expired: true,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn conflict(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    /// Folds field-level validation failures into a single `BadRequest`.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();

        Self::bad_request(messages.join(", "))
    }

    /// Maps a repository error from an insert path to `Conflict` when the
    /// storage-level uniqueness constraint fired, `Internal` otherwise. The
    /// unique index is the concurrency control for duplicate writes.
    pub fn from_insert(
        err: anyhow::Error,
        entity: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        let is_unique = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);

        if is_unique {
            Self::conflict(entity, identifier)
        } else {
            Self::Internal { source: err }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_expired_sets_flag() {
        match ServiceError::token_expired() {
            ServiceError::Unauthorized { token_expired, .. } => assert!(token_expired),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn unauthorized_does_not_set_flag() {
        match ServiceError::unauthorized("wrong password") {
            ServiceError::Unauthorized { token_expired, .. } => assert!(!token_expired),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn from_insert_maps_non_db_errors_to_internal() {
        let err = ServiceError::from_insert(anyhow::anyhow!("boom"), "User", "a@x.com");
        assert!(matches!(err, ServiceError::Internal { .. }));
    }
}
