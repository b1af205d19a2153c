//! Admin business logic, including the one-time bootstrap rule.
//!
//! The first admin ever registered becomes superadmin unconditionally; once
//! any admin row exists, only an authenticated superadmin may register
//! further admins. The trapdoor never reopens.

use crate::auth::models::RegisterAdminRequest;
use crate::database::models::{Admin, AdminRole, CreateAdminRecord, PublicAdmin};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::admin_repository::AdminRepository;
use crate::utils::crypto::{hash_password, verify_password};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct AdminService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> AdminService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers an admin. `caller` is the authenticated admin making the
    /// request, or None for an unauthenticated attempt (only valid while the
    /// admins table is empty).
    pub async fn register_admin(
        &self,
        request: RegisterAdminRequest,
        caller: Option<&PublicAdmin>,
    ) -> ServiceResult<Admin> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        let repo = AdminRepository::new(self.pool);
        let bootstrap = repo.admin_count().await? == 0;

        let (role, created_by) = if bootstrap {
            // First admin: superadmin regardless of caller identity.
            (AdminRole::Superadmin, None)
        } else {
            let caller = caller.ok_or_else(|| {
                ServiceError::forbidden("only a superadmin can register admins")
            })?;
            if caller.role != AdminRole::Superadmin {
                return Err(ServiceError::forbidden(
                    "only a superadmin can register admins",
                ));
            }
            (AdminRole::Admin, Some(caller.id.clone()))
        };

        let email = request.email.trim().to_lowercase();
        if repo.email_exists(&email).await? {
            return Err(ServiceError::conflict("Admin", &email));
        }

        let password_hash = hash_password(&request.password)?;

        let record = CreateAdminRecord {
            id: Uuid::now_v7().to_string(),
            name: request.name,
            email: email.clone(),
            password_hash,
            role,
            created_by,
        };

        repo.create_admin(record)
            .await
            .map_err(|e| ServiceError::from_insert(e, "Admin", &email))
    }

    pub async fn authenticate_admin(&self, email: &str, password: &str) -> ServiceResult<Admin> {
        let repo = AdminRepository::new(self.pool);
        let admin = repo
            .get_admin_by_email(email.trim())
            .await?
            .ok_or_else(|| ServiceError::unauthorized("invalid email or password"))?;

        if !verify_password(password, &admin.password_hash)? {
            return Err(ServiceError::unauthorized("invalid email or password"));
        }

        Ok(admin)
    }

    pub async fn get_admin_required(&self, id: &str) -> ServiceResult<Admin> {
        let admin = AdminRepository::new(self.pool)
            .get_admin_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Admin", id))?;
        Ok(admin)
    }

    /// Changes an admin's role. Outstanding access tokens keep their old
    /// claim until expiry; the refresh flow picks up the new role.
    pub async fn set_role(&self, admin_id: &str, role: AdminRole) -> ServiceResult<Admin> {
        let repo = AdminRepository::new(self.pool);
        repo.get_admin_by_id(admin_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Admin", admin_id))?;

        repo.set_role(admin_id, role).await?;
        self.get_admin_required(admin_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::test_pool;

    fn request(email: &str) -> RegisterAdminRequest {
        RegisterAdminRequest {
            name: "Root".to_string(),
            email: email.to_string(),
            password: "Sup3rSecret!".to_string(),
        }
    }

    #[tokio::test]
    async fn first_admin_becomes_superadmin_without_caller() {
        let pool = test_pool().await;
        let service = AdminService::new(&pool);

        let admin = service.register_admin(request("root@x.com"), None).await.unwrap();
        assert_eq!(admin.role, AdminRole::Superadmin);
        assert_eq!(admin.created_by, None);
    }

    #[tokio::test]
    async fn second_admin_requires_superadmin_caller() {
        let pool = test_pool().await;
        let service = AdminService::new(&pool);

        let root: PublicAdmin = service
            .register_admin(request("root@x.com"), None)
            .await
            .unwrap()
            .into();

        // Unauthenticated attempt: the trapdoor is closed.
        let denied = service.register_admin(request("two@x.com"), None).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden { .. })));

        // Superadmin caller succeeds; the new admin is a plain admin.
        let second = service
            .register_admin(request("two@x.com"), Some(&root))
            .await
            .unwrap();
        assert_eq!(second.role, AdminRole::Admin);
        assert_eq!(second.created_by.as_deref(), Some(root.id.as_str()));

        // A plain admin cannot register further admins.
        let second_public: PublicAdmin = second.into();
        let denied = service
            .register_admin(request("three@x.com"), Some(&second_public))
            .await;
        assert!(matches!(denied, Err(ServiceError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn duplicate_admin_email_conflicts() {
        let pool = test_pool().await;
        let service = AdminService::new(&pool);

        let root: PublicAdmin = service
            .register_admin(request("root@x.com"), None)
            .await
            .unwrap()
            .into();
        let dup = service
            .register_admin(request("ROOT@x.com"), Some(&root))
            .await;
        assert!(matches!(dup, Err(ServiceError::Conflict { .. })));
    }

    #[tokio::test]
    async fn promotion_changes_stored_role() {
        let pool = test_pool().await;
        let service = AdminService::new(&pool);

        let root: PublicAdmin = service
            .register_admin(request("root@x.com"), None)
            .await
            .unwrap()
            .into();
        let second = service
            .register_admin(request("two@x.com"), Some(&root))
            .await
            .unwrap();

        let promoted = service
            .set_role(&second.id, AdminRole::Superadmin)
            .await
            .unwrap();
        assert_eq!(promoted.role, AdminRole::Superadmin);
    }

    #[tokio::test]
    async fn admin_authentication_mirrors_user_rules() {
        let pool = test_pool().await;
        let service = AdminService::new(&pool);
        service.register_admin(request("root@x.com"), None).await.unwrap();

        assert!(
            service
                .authenticate_admin("Root@X.com", "Sup3rSecret!")
                .await
                .is_ok()
        );
        assert!(matches!(
            service.authenticate_admin("root@x.com", "wrong").await,
            Err(ServiceError::Unauthorized { .. })
        ));
    }
}
