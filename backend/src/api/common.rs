//! Error handling utilities for API responses.
//!
//! Provides the standard response envelope and the conversion from
//! service-layer errors to HTTP responses.
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `error`: Human-readable message
//! - `error_type`: Machine-readable error category
//! - `token_expired`: set only for the expired-access-token 401, so client
//!   retry logic can call the refresh endpoint instead of re-prompting login
//! - `details`: Optional field-specific validation errors

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Request timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Distinguishes a validly-signed but expired access token from every
    /// other 401, enabling silent refresh on the client
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub token_expired: bool,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful response with default message
    pub fn ok(data: T) -> Self {
        Self::success(data, "Request successful")
    }

    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        token_expired: bool,
        details: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                token_expired,
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, error_type, message, token_expired) = match error {
        ServiceError::BadRequest { message } => {
            (StatusCode::BAD_REQUEST, "bad_request", message, false)
        }
        ServiceError::Unauthorized {
            message,
            token_expired,
        } => {
            let error_type = if token_expired {
                "token_expired"
            } else {
                "unauthorized"
            };
            (StatusCode::UNAUTHORIZED, error_type, message, token_expired)
        }
        ServiceError::Forbidden { message } => (StatusCode::FORBIDDEN, "forbidden", message, false),
        ServiceError::Conflict { entity, identifier } => (
            StatusCode::CONFLICT,
            "conflict",
            format!("{} '{}' already exists", entity, identifier),
            false,
        ),
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
            false,
        ),
        ServiceError::Internal { source } => {
            tracing::error!("Internal error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
                false,
            )
        }
    };

    let error_response = ApiResponse::<()>::error(message, error_type, token_expired, None);
    (status, serde_json::to_string(&error_response).unwrap())
}

/// Narrows the authenticated principal to a student, for routes that operate
/// on the caller's own yearbook data.
pub fn require_user(
    principal: &crate::auth::models::AuthPrincipal,
) -> Result<&crate::database::models::PublicUser, (StatusCode, String)> {
    principal
        .as_user()
        .ok_or_else(|| service_error_to_http(ServiceError::forbidden("student access required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_token_maps_to_flagged_401() {
        let (status, body) = service_error_to_http(ServiceError::token_expired());
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let parsed: ApiResponse<()> = serde_json::from_str(&body).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.error_type, "token_expired");
        assert!(error.token_expired);
    }

    #[test]
    fn plain_unauthorized_is_not_flagged() {
        let (status, body) =
            service_error_to_http(ServiceError::unauthorized("invalid token"));
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let parsed: ApiResponse<()> = serde_json::from_str(&body).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.error_type, "unauthorized");
        assert!(!error.token_expired);
        // The flag is omitted from the wire entirely when false.
        assert!(!body.contains("token_expired"));
    }

    #[test]
    fn internal_errors_never_leak_details() {
        let (status, body) = service_error_to_http(ServiceError::Internal {
            source: anyhow::anyhow!("connection refused to db at 10.0.0.3"),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("10.0.0.3"));
    }

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        let cases = [
            (ServiceError::bad_request("x"), StatusCode::BAD_REQUEST),
            (ServiceError::forbidden("x"), StatusCode::FORBIDDEN),
            (ServiceError::conflict("User", "a@x.com"), StatusCode::CONFLICT),
            (ServiceError::not_found("User", "u-1"), StatusCode::NOT_FOUND),
        ];
        for (error, expected) in cases {
            assert_eq!(service_error_to_http(error).0, expected);
        }
    }
}
