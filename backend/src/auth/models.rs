//! Data structures for authentication-related entities.
//!
//! Request/response DTOs for the auth endpoints and the typed principal
//! attached to authenticated requests.

use crate::database::models::{AdminRole, PrincipalType, PublicAdmin, PublicUser};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The authenticated identity attached to a request by the auth middleware.
///
/// An explicit variant type, not duck-typing on the presence of a role field:
/// the wire-level claim uses "role present means admin" for compactness, but
/// in-process code matches on this enum.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AuthPrincipal {
    User(PublicUser),
    Admin(PublicAdmin),
}

impl AuthPrincipal {
    pub fn id(&self) -> &str {
        match self {
            AuthPrincipal::User(user) => &user.id,
            AuthPrincipal::Admin(admin) => &admin.id,
        }
    }

    pub fn principal_type(&self) -> PrincipalType {
        match self {
            AuthPrincipal::User(_) => PrincipalType::User,
            AuthPrincipal::Admin(_) => PrincipalType::Admin,
        }
    }

    pub fn as_admin(&self) -> Option<&PublicAdmin> {
        match self {
            AuthPrincipal::Admin(admin) => Some(admin),
            AuthPrincipal::User(_) => None,
        }
    }

    pub fn as_user(&self) -> Option<&PublicUser> {
        match self {
            AuthPrincipal::User(user) => Some(user),
            AuthPrincipal::Admin(_) => None,
        }
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(
            self,
            AuthPrincipal::Admin(admin) if admin.role == AdminRole::Superadmin
        )
    }
}

/// Login request payload, shared by the user and admin login endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Enrollment number is required"))]
    pub enrollment_number: String,

    #[validate(length(min = 1, message = "Batch code is required"))]
    pub batch_code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAdminRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetAdminRoleRequest {
    pub role: AdminRole,
}

/// Login response. The refresh token travels only as an HTTP-only cookie and
/// is never serialized into the body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub expires_in: i64,
    pub principal: AuthPrincipal,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}
