//! Database repository for refresh sessions.
//!
//! Sessions are invalidated, never deleted, on revocation; a token string is
//! never reactivated. The unique index on `token` is the concurrency control
//! for issuance, and the read-then-compare on `is_valid` happens inside the
//! single UPDATE statement for invalidation.

use crate::database::models::{PrincipalType, RefreshSession};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SessionRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> SessionRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        id: &str,
        principal_id: &str,
        principal_type: PrincipalType,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshSession> {
        let session = sqlx::query_as::<_, RefreshSession>(
            r#"
            INSERT INTO refresh_sessions (id, principal_id, principal_type, token, expires_at, is_valid)
            VALUES (?, ?, ?, ?, ?, 1)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(principal_id)
        .bind(principal_type)
        .bind(token)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(session)
    }

    /// Returns the session only if it is still valid and unexpired.
    pub async fn find_usable(&self, token: &str) -> Result<Option<RefreshSession>> {
        let session = sqlx::query_as::<_, RefreshSession>(
            "SELECT * FROM refresh_sessions WHERE token = ? AND is_valid = 1 AND expires_at > ?",
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(self.pool)
        .await?;

        Ok(session)
    }

    /// Returns the session row regardless of validity or expiry. Used by the
    /// logout path to resolve the owning principal of a stale token.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<RefreshSession>> {
        let session =
            sqlx::query_as::<_, RefreshSession>("SELECT * FROM refresh_sessions WHERE token = ?")
                .bind(token)
                .fetch_optional(self.pool)
                .await?;

        Ok(session)
    }

    /// Marks the exact token row invalid. Idempotent: unknown or
    /// already-invalid tokens are a no-op.
    pub async fn invalidate(&self, token: &str) -> Result<()> {
        sqlx::query("UPDATE refresh_sessions SET is_valid = 0 WHERE token = ?")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Marks every session for the principal invalid.
    pub async fn invalidate_all(
        &self,
        principal_id: &str,
        principal_type: PrincipalType,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET is_valid = 0 WHERE principal_id = ? AND principal_type = ?",
        )
        .bind(principal_id)
        .bind(principal_type)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Maintenance sweep: drops rows whose expiry is already behind `before`.
    /// Stale invalid rows are functionally inert, so this is optional.
    pub async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_sessions WHERE expires_at < ?")
            .bind(before)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
