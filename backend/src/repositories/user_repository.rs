//! Database repository for user principals.
//!
//! Half of the credential store; the other half is `admin_repository`.
//! Email lookups are case-insensitive and uniqueness is enforced by a
//! unique index on lower(email), scoped to this table only.

use crate::database::models::{CreateUserRecord, User};
use anyhow::Result;
use sqlx::SqlitePool;

pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new user. The unique indexes on lower(email) and on
    /// (batch_id, enrollment_number) are the concurrency control for
    /// duplicate registrations.
    pub async fn create_user(&self, record: CreateUserRecord) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, enrollment_number, batch_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.enrollment_number)
        .bind(&record.batch_id)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Case-insensitive exact match on email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower(?)")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower(?))",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn get_users_by_batch_id(&self, batch_id: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE batch_id = ? ORDER BY created_at DESC",
        )
        .bind(batch_id)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_verified = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(verified)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
