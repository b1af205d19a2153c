//! College business logic.

use crate::database::models::{College, CreateCollegeRequest};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::college_repository::CollegeRepository;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct CollegeService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> CollegeService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_college(&self, request: CreateCollegeRequest) -> ServiceResult<College> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        let name = request.name.trim().to_string();
        CollegeRepository::new(self.pool)
            .create_college(&Uuid::now_v7().to_string(), &name)
            .await
            .map_err(|e| ServiceError::from_insert(e, "College", &name))
    }

    pub async fn get_college_required(&self, id: &str) -> ServiceResult<College> {
        CollegeRepository::new(self.pool)
            .get_college_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("College", id))
    }

    pub async fn list_colleges(&self) -> ServiceResult<Vec<College>> {
        let colleges = CollegeRepository::new(self.pool).list_colleges().await?;
        Ok(colleges)
    }

    pub async fn delete_college(&self, id: &str) -> ServiceResult<()> {
        let deleted = CollegeRepository::new(self.pool).delete_college(id).await?;
        if deleted == 0 {
            return Err(ServiceError::not_found("College", id));
        }
        Ok(())
    }
}
