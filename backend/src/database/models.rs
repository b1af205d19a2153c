//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Public projection types strip password hashes before
//! anything leaves the service layer; API-facing request DTOs live here too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Discriminates the two principal variants sharing the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PrincipalType {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Superadmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::Superadmin => "superadmin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MontageStatus {
    Queued,
    Processing,
    Done,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub enrollment_number: String,
    pub batch_id: String,
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User projection safe to attach to requests and return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub enrollment_number: String,
    pub batch_id: String,
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            enrollment_number: user.enrollment_number,
            batch_id: user.batch_id,
            profile_picture_url: user.profile_picture_url,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAdmin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for PublicAdmin {
    fn from(admin: Admin) -> Self {
        PublicAdmin {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            role: admin.role,
            created_at: admin.created_at,
        }
    }
}

/// Long-lived server-side record backing the refresh flow. Usable iff
/// `is_valid` and not past `expires_at`; invalidated rows are never revived.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: String,
    pub principal_id: String,
    pub principal_type: PrincipalType,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct College {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Batch {
    pub id: String,
    pub college_id: String,
    pub name: String,
    pub join_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    pub photo_url: String,
    pub quote: Option<String>,
    pub favourite_memory: Option<String>,
    pub advice: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: String,
    pub sender_user_id: String,
    pub recipient_user_id: String,
    pub body: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// photo_urls is a JSON-encoded array; the montage service owns the encoding.
#[derive(Debug, Clone, FromRow)]
pub struct MontageJob {
    pub id: String,
    pub user_id: String,
    pub photo_urls: String,
    pub status: MontageStatus,
    pub result_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Write-side records (password already hashed by the service layer)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateUserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub enrollment_number: String,
    pub batch_id: String,
}

#[derive(Debug, Clone)]
pub struct CreateAdminRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    pub created_by: Option<String>,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollegeRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "College name must be between 1-255 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBatchRequest {
    #[validate(length(min = 1, message = "College ID is required"))]
    pub college_id: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Batch name must be between 1-255 characters"
    ))]
    pub name: String,

    /// Roster of enrollment numbers admitted to this batch.
    #[validate(length(min = 1, message = "At least one enrollment number is required"))]
    pub enrollment_numbers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddEnrollmentsRequest {
    #[validate(length(min = 1, message = "At least one enrollment number is required"))]
    pub enrollment_numbers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEntryRequest {
    #[validate(length(min = 1, message = "Photo URL is required"))]
    pub photo_url: String,
    pub quote: Option<String>,
    pub favourite_memory: Option<String>,
    pub advice: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEntryRequest {
    pub photo_url: Option<String>,
    pub quote: Option<String>,
    pub favourite_memory: Option<String>,
    pub advice: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Recipient is required"))]
    pub recipient_user_id: String,

    #[validate(length(min = 1, max = 2000, message = "Body must be between 1-2000 characters"))]
    pub body: String,

    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitMontageRequest {
    #[validate(length(min = 1, message = "At least one photo URL is required"))]
    pub photo_urls: Vec<String>,
}
