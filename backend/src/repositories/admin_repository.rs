//! Database repository for admin principals.
//!
//! Admin emails are unique within this table only; a user and an admin may
//! share an email. `admin_count` drives the one-time bootstrap rule.

use crate::database::models::{Admin, AdminRole, CreateAdminRecord};
use anyhow::Result;
use sqlx::SqlitePool;

pub struct AdminRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_admin(&self, record: CreateAdminRecord) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, name, email, password_hash, role, created_by)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.role)
        .bind(&record.created_by)
        .fetch_one(self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn get_admin_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(admin)
    }

    /// Case-insensitive exact match on email.
    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE lower(email) = lower(?)")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM admins WHERE lower(email) = lower(?))",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Counts all admin rows; zero means the bootstrap trapdoor is still open.
    pub async fn admin_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn set_role(&self, id: &str, role: AdminRole) -> Result<()> {
        sqlx::query("UPDATE admins SET role = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
