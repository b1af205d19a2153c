//! Database repository for montage jobs.
//!
//! Only the queue side lives here; the rendering worker consumes these rows
//! out of process.

use crate::database::models::{MontageJob, MontageStatus};
use anyhow::Result;
use sqlx::SqlitePool;

pub struct MontageRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> MontageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_job(
        &self,
        id: &str,
        user_id: &str,
        photo_urls_json: &str,
    ) -> Result<MontageJob> {
        let job = sqlx::query_as::<_, MontageJob>(
            r#"
            INSERT INTO montage_jobs (id, user_id, photo_urls, status)
            VALUES (?, ?, ?, 'queued')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(photo_urls_json)
        .fetch_one(self.pool)
        .await?;

        Ok(job)
    }

    pub async fn get_job_by_id(&self, id: &str) -> Result<Option<MontageJob>> {
        let job = sqlx::query_as::<_, MontageJob>("SELECT * FROM montage_jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(job)
    }

    pub async fn list_jobs_by_user(&self, user_id: &str) -> Result<Vec<MontageJob>> {
        let jobs = sqlx::query_as::<_, MontageJob>(
            "SELECT * FROM montage_jobs WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(jobs)
    }

    pub async fn set_status(
        &self,
        id: &str,
        status: MontageStatus,
        result_url: Option<&str>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE montage_jobs SET status = ?, result_url = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(status)
        .bind(result_url)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
