//! Refresh-session orchestration.
//!
//! The bridge between a validated refresh token and a freshly minted access
//! token: issues opaque tokens, verifies them against the session store, and
//! revokes them per-token or principal-wide. Invalidation is idempotent and
//! never surfaces NotFound; only the verify path distinguishes absence, which
//! callers fold into Unauthorized.

use crate::database::models::{PrincipalType, RefreshSession};
use crate::errors::ServiceResult;
use crate::repositories::session_repository::SessionRepository;
use crate::utils::generate_random_string::generate_random_string;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Opaque token length, alphanumeric. 48 chars is well past 20 bytes of entropy.
const REFRESH_TOKEN_LENGTH: usize = 48;

pub struct SessionManager<'a> {
    pool: &'a SqlitePool,
    refresh_ttl_days: i64,
}

impl<'a> SessionManager<'a> {
    pub fn new(pool: &'a SqlitePool, refresh_ttl_days: i64) -> Self {
        Self {
            pool,
            refresh_ttl_days,
        }
    }

    /// Creates a new refresh session for the principal. Concurrent sessions
    /// for the same principal are permitted (multi-device).
    pub async fn issue(
        &self,
        principal_id: &str,
        principal_type: PrincipalType,
    ) -> ServiceResult<RefreshSession> {
        let repo = SessionRepository::new(self.pool);
        let token = generate_random_string(REFRESH_TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::days(self.refresh_ttl_days);

        let session = repo
            .insert(
                &Uuid::now_v7().to_string(),
                principal_id,
                principal_type,
                &token,
                expires_at,
            )
            .await?;

        Ok(session)
    }

    /// Returns the session iff it exists, is still valid and is unexpired.
    /// Absence is not an error; callers map None to Unauthorized.
    pub async fn verify(&self, token: &str) -> ServiceResult<Option<RefreshSession>> {
        let session = SessionRepository::new(self.pool).find_usable(token).await?;
        Ok(session)
    }

    /// Resolves the session row for a presented token regardless of validity,
    /// so logout can revoke a principal's sessions from a stale token.
    pub async fn find(&self, token: &str) -> ServiceResult<Option<RefreshSession>> {
        let session = SessionRepository::new(self.pool).find_by_token(token).await?;
        Ok(session)
    }

    /// Invalidates the exact token row. No-op for unknown or already-invalid
    /// tokens.
    pub async fn invalidate(&self, token: &str) -> ServiceResult<()> {
        SessionRepository::new(self.pool).invalidate(token).await?;
        Ok(())
    }

    /// Invalidates every session belonging to (principal_id, principal_type).
    pub async fn invalidate_all(
        &self,
        principal_id: &str,
        principal_type: PrincipalType,
    ) -> ServiceResult<u64> {
        let revoked = SessionRepository::new(self.pool)
            .invalidate_all(principal_id, principal_type)
            .await?;
        Ok(revoked)
    }

    /// Lazy cleanup of rows past their expiry. Stale invalid rows are inert,
    /// so skipping this never affects behavior.
    pub async fn sweep_expired(&self) -> ServiceResult<u64> {
        let removed = SessionRepository::new(self.pool)
            .delete_expired(Utc::now())
            .await?;
        Ok(removed)
    }
}
