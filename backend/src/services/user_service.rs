//! User business logic.
//!
//! Registration requires a batch join code and an enrollment number on that
//! batch's roster. Passwords are hashed here, explicitly, before anything is
//! handed to a repository; no implicit lifecycle hooks.

use crate::auth::models::RegisterUserRequest;
use crate::database::models::{CreateUserRecord, PublicUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::batch_repository::BatchRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::crypto::{hash_password, verify_password};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user under a batch.
    ///
    /// # Errors
    /// - `BadRequest` for field validation failures
    /// - `NotFound` when the batch code or roster entry does not exist
    /// - `Conflict` for a duplicate email or an already-claimed enrollment
    pub async fn register_user(&self, request: RegisterUserRequest) -> ServiceResult<User> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        let email = request.email.trim().to_lowercase();

        let batch_repo = BatchRepository::new(self.pool);
        let batch = batch_repo
            .get_batch_by_join_code(&request.batch_code)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch", &request.batch_code))?;

        if !batch_repo
            .enrollment_on_roster(&batch.id, &request.enrollment_number)
            .await?
        {
            return Err(ServiceError::not_found(
                "Enrollment",
                &request.enrollment_number,
            ));
        }

        let repo = UserRepository::new(self.pool);
        if repo.email_exists(&email).await? {
            return Err(ServiceError::conflict("User", &email));
        }

        let password_hash = hash_password(&request.password)?;

        let record = CreateUserRecord {
            id: Uuid::now_v7().to_string(),
            name: request.name,
            email: email.clone(),
            password_hash,
            enrollment_number: request.enrollment_number,
            batch_id: batch.id,
        };

        // The unique indexes catch the race a pre-check cannot.
        repo.create_user(record)
            .await
            .map_err(|e| ServiceError::from_insert(e, "User", &email))
    }

    /// Verifies email + password, yielding the user on success. Unknown email
    /// and wrong password collapse into the same Unauthorized message.
    pub async fn authenticate_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(email.trim())
            .await?
            .ok_or_else(|| ServiceError::unauthorized("invalid email or password"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ServiceError::unauthorized("invalid email or password"));
        }

        Ok(user)
    }

    /// Registered members of a batch, for the admin member view.
    pub async fn list_batch_members(&self, batch_id: &str) -> ServiceResult<Vec<PublicUser>> {
        BatchRepository::new(self.pool)
            .get_batch_by_id(batch_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch", batch_id))?;

        let users = UserRepository::new(self.pool)
            .get_users_by_batch_id(batch_id)
            .await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Marks a student as identity-verified. Idempotent.
    pub async fn verify_user(&self, user_id: &str) -> ServiceResult<PublicUser> {
        let repo = UserRepository::new(self.pool);
        repo.get_user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        repo.set_verified(user_id, true).await?;
        let user = repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::test_pool;
    use crate::repositories::college_repository::CollegeRepository;

    async fn seed_batch(pool: &SqlitePool, roster: &[&str]) -> String {
        CollegeRepository::new(pool)
            .create_college("col-1", "Test College")
            .await
            .unwrap();
        let batch_repo = BatchRepository::new(pool);
        let batch = batch_repo
            .create_batch("batch-1", "col-1", "2021-2025", "JOINCODE")
            .await
            .unwrap();
        for number in roster {
            batch_repo.add_enrollment(&batch.id, number).await.unwrap();
        }
        batch.id
    }

    fn request(email: &str, enrollment: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
            enrollment_number: enrollment.to_string(),
            batch_code: "JOINCODE".to_string(),
        }
    }

    #[tokio::test]
    async fn registration_hashes_password_and_normalizes_email() {
        let pool = test_pool().await;
        seed_batch(&pool, &["EN-001"]).await;

        let user = UserService::new(&pool)
            .register_user(request("  Ada@X.Com ", "EN-001"))
            .await
            .unwrap();

        assert_eq!(user.email, "ada@x.com");
        assert_ne!(user.password_hash, "Passw0rd!");
    }

    #[tokio::test]
    async fn authentication_requires_exact_password() {
        let pool = test_pool().await;
        seed_batch(&pool, &["EN-001"]).await;
        let service = UserService::new(&pool);
        service.register_user(request("a@x.com", "EN-001")).await.unwrap();

        assert!(service.authenticate_user("a@x.com", "Passw0rd!").await.is_ok());
        // Lookup is case-insensitive on email.
        assert!(service.authenticate_user("A@X.COM", "Passw0rd!").await.is_ok());

        let wrong = service.authenticate_user("a@x.com", "passw0rd!").await;
        assert!(matches!(wrong, Err(ServiceError::Unauthorized { .. })));
        let unknown = service.authenticate_user("b@x.com", "Passw0rd!").await;
        assert!(matches!(unknown, Err(ServiceError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let pool = test_pool().await;
        seed_batch(&pool, &["EN-001", "EN-002"]).await;
        let service = UserService::new(&pool);

        service.register_user(request("a@x.com", "EN-001")).await.unwrap();
        let dup = service.register_user(request("A@x.com", "EN-002")).await;
        assert!(matches!(dup, Err(ServiceError::Conflict { .. })));
    }

    #[tokio::test]
    async fn claimed_enrollment_conflicts() {
        let pool = test_pool().await;
        seed_batch(&pool, &["EN-001"]).await;
        let service = UserService::new(&pool);

        service.register_user(request("a@x.com", "EN-001")).await.unwrap();
        let claimed = service.register_user(request("b@x.com", "EN-001")).await;
        assert!(matches!(claimed, Err(ServiceError::Conflict { .. })));
    }

    #[tokio::test]
    async fn unknown_batch_code_and_roster_miss_are_not_found() {
        let pool = test_pool().await;
        seed_batch(&pool, &["EN-001"]).await;
        let service = UserService::new(&pool);

        let mut bad_code = request("a@x.com", "EN-001");
        bad_code.batch_code = "WRONG".to_string();
        assert!(matches!(
            service.register_user(bad_code).await,
            Err(ServiceError::NotFound { .. })
        ));

        let off_roster = request("a@x.com", "EN-999");
        assert!(matches!(
            service.register_user(off_roster).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn member_listing_and_verification() {
        let pool = test_pool().await;
        let batch_id = seed_batch(&pool, &["EN-001"]).await;
        let service = UserService::new(&pool);

        let user = service.register_user(request("a@x.com", "EN-001")).await.unwrap();
        assert!(!user.is_verified);

        let members = service.list_batch_members(&batch_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(!members[0].is_verified);

        let verified = service.verify_user(&user.id).await.unwrap();
        assert!(verified.is_verified);
        // Idempotent.
        assert!(service.verify_user(&user.id).await.unwrap().is_verified);

        assert!(matches!(
            service.list_batch_members("no-such-batch").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.verify_user("no-such-user").await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
