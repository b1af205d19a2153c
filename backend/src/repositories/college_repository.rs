//! Database repository for colleges.

use crate::database::models::College;
use anyhow::Result;
use sqlx::SqlitePool;

pub struct CollegeRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> CollegeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_college(&self, id: &str, name: &str) -> Result<College> {
        let college = sqlx::query_as::<_, College>(
            "INSERT INTO colleges (id, name) VALUES (?, ?) RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(college)
    }

    pub async fn get_college_by_id(&self, id: &str) -> Result<Option<College>> {
        let college = sqlx::query_as::<_, College>("SELECT * FROM colleges WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(college)
    }

    pub async fn list_colleges(&self) -> Result<Vec<College>> {
        let colleges = sqlx::query_as::<_, College>("SELECT * FROM colleges ORDER BY name")
            .fetch_all(self.pool)
            .await?;

        Ok(colleges)
    }

    pub async fn delete_college(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM colleges WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
