//! Database repository for batches and their enrollment rosters.

use crate::database::models::Batch;
use anyhow::Result;
use sqlx::SqlitePool;

pub struct BatchRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> BatchRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_batch(
        &self,
        id: &str,
        college_id: &str,
        name: &str,
        join_code: &str,
    ) -> Result<Batch> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (id, college_id, name, join_code)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(college_id)
        .bind(name)
        .bind(join_code)
        .fetch_one(self.pool)
        .await?;

        Ok(batch)
    }

    /// Creates the batch and its roster in one transaction; a failing roster
    /// insert rolls back the batch row too.
    pub async fn create_batch_with_roster(
        &self,
        id: &str,
        college_id: &str,
        name: &str,
        join_code: &str,
        roster: &[String],
    ) -> Result<Batch> {
        let mut tx = self.pool.begin().await?;

        let batch = sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (id, college_id, name, join_code)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(college_id)
        .bind(name)
        .bind(join_code)
        .fetch_one(&mut *tx)
        .await?;

        for number in roster {
            sqlx::query("INSERT INTO batch_enrollments (batch_id, enrollment_number) VALUES (?, ?)")
                .bind(&batch.id)
                .bind(number)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(batch)
    }

    pub async fn get_batch_by_id(&self, id: &str) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(batch)
    }

    pub async fn get_batch_by_join_code(&self, join_code: &str) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE join_code = ?")
            .bind(join_code)
            .fetch_optional(self.pool)
            .await?;

        Ok(batch)
    }

    pub async fn list_batches_by_college(&self, college_id: &str) -> Result<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(
            "SELECT * FROM batches WHERE college_id = ? ORDER BY created_at DESC",
        )
        .bind(college_id)
        .fetch_all(self.pool)
        .await?;

        Ok(batches)
    }

    pub async fn set_join_code(&self, id: &str, join_code: &str) -> Result<()> {
        sqlx::query("UPDATE batches SET join_code = ? WHERE id = ?")
            .bind(join_code)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Adds one roster entry. The composite primary key rejects duplicates.
    pub async fn add_enrollment(&self, batch_id: &str, enrollment_number: &str) -> Result<()> {
        sqlx::query("INSERT INTO batch_enrollments (batch_id, enrollment_number) VALUES (?, ?)")
            .bind(batch_id)
            .bind(enrollment_number)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Adds a set of roster entries all-or-nothing: one duplicate rolls back
    /// the whole addition.
    pub async fn add_enrollments(&self, batch_id: &str, numbers: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for number in numbers {
            sqlx::query("INSERT INTO batch_enrollments (batch_id, enrollment_number) VALUES (?, ?)")
                .bind(batch_id)
                .bind(number)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn enrollment_on_roster(
        &self,
        batch_id: &str,
        enrollment_number: &str,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM batch_enrollments WHERE batch_id = ? AND enrollment_number = ?)",
        )
        .bind(batch_id)
        .bind(enrollment_number)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list_roster(&self, batch_id: &str) -> Result<Vec<String>> {
        let roster = sqlx::query_scalar::<_, String>(
            "SELECT enrollment_number FROM batch_enrollments WHERE batch_id = ? ORDER BY enrollment_number",
        )
        .bind(batch_id)
        .fetch_all(self.pool)
        .await?;

        Ok(roster)
    }
}
