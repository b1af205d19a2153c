//! Core business logic for the authentication system.
//!
//! Orchestrates credential verification, access-token minting and
//! refresh-session issuance for both principal variants.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::{Admin, PrincipalType, PublicAdmin, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::admin_repository::AdminRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::admin_service::AdminService;
use crate::services::session_manager::SessionManager;
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtUtils;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service for login, registration, token refresh and logout
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
    refresh_ttl_days: i64,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        AuthService {
            pool,
            jwt_utils: JwtUtils::from_config(config),
            refresh_ttl_days: config.refresh_session_ttl_days,
        }
    }

    fn session_manager(&self) -> SessionManager<'a> {
        SessionManager::new(self.pool, self.refresh_ttl_days)
    }

    /// Mints an access token and a refresh session for the principal. The
    /// role claim is populated only for admins.
    async fn issue_tokens(&self, principal: AuthPrincipal) -> ServiceResult<LoginResponse> {
        let role = principal.as_admin().map(|admin| admin.role.as_str());
        let access_token = self.jwt_utils.sign_access_token(principal.id(), role)?;
        let session = self
            .session_manager()
            .issue(principal.id(), principal.principal_type())
            .await?;

        Ok(LoginResponse {
            access_token,
            refresh_token: session.token,
            expires_in: self.jwt_utils.access_ttl_seconds(),
            principal,
        })
    }

    /// Registers a user and logs them straight in.
    pub async fn register_user(&self, request: RegisterUserRequest) -> ServiceResult<LoginResponse> {
        let user = UserService::new(self.pool).register_user(request).await?;
        self.issue_tokens(AuthPrincipal::User(user.into())).await
    }

    pub async fn login_user(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        let user: User = UserService::new(self.pool)
            .authenticate_user(&request.email, &request.password)
            .await?;
        self.issue_tokens(AuthPrincipal::User(user.into())).await
    }

    /// Registers an admin under the bootstrap rule. Does not log the new
    /// admin in; admin registration is an administrative act, not a login.
    pub async fn register_admin(
        &self,
        request: RegisterAdminRequest,
        caller: Option<&PublicAdmin>,
    ) -> ServiceResult<PublicAdmin> {
        let admin = AdminService::new(self.pool)
            .register_admin(request, caller)
            .await?;
        Ok(admin.into())
    }

    pub async fn login_admin(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::from_validation(errors));
        }

        let admin: Admin = AdminService::new(self.pool)
            .authenticate_admin(&request.email, &request.password)
            .await?;
        self.issue_tokens(AuthPrincipal::Admin(admin.into())).await
    }

    /// Exchanges a valid refresh token for a fresh access token. The refresh
    /// session itself is neither rotated nor extended. The new token carries
    /// the principal's current role, reflecting any change since login.
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<RefreshTokenResponse> {
        let session = self
            .session_manager()
            .verify(refresh_token)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("invalid or expired refresh token"))?;

        let role = match session.principal_type {
            PrincipalType::Admin => {
                let admin = AdminRepository::new(self.pool)
                    .get_admin_by_id(&session.principal_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Admin", &session.principal_id))?;
                Some(admin.role.as_str())
            }
            PrincipalType::User => {
                UserRepository::new(self.pool)
                    .get_user_by_id(&session.principal_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("User", &session.principal_id))?;
                None
            }
        };

        let access_token = self
            .jwt_utils
            .sign_access_token(&session.principal_id, role)?;

        Ok(RefreshTokenResponse {
            access_token,
            expires_in: self.jwt_utils.access_ttl_seconds(),
        })
    }

    /// Principal-wide logout: a presented refresh token, even a stale one,
    /// revokes every session its owner holds. Without a token this is an
    /// idempotent success.
    pub async fn logout(&self, refresh_token: Option<&str>) -> ServiceResult<()> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        let manager = self.session_manager();
        if let Some(session) = manager.find(token).await? {
            manager
                .invalidate_all(&session.principal_id, session.principal_type)
                .await?;
        }

        Ok(())
    }

    /// Device-local logout: invalidates exactly the presented token, leaving
    /// the principal's other sessions intact.
    pub async fn logout_device(&self, refresh_token: Option<&str>) -> ServiceResult<()> {
        if let Some(token) = refresh_token {
            self.session_manager().invalidate(token).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::AdminRole;
    use crate::database::test_support::test_pool;
    use crate::repositories::batch_repository::BatchRepository;
    use crate::repositories::college_repository::CollegeRepository;
    use crate::services::admin_service::AdminService;
    use crate::utils::jwt::TokenVerification;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "test-secret".to_string(),
            access_token_ttl_seconds: 3600,
            refresh_session_ttl_days: 15,
            cookie_secure: false,
            server_port: 0,
        }
    }

    async fn seed_batch(pool: &SqlitePool) {
        CollegeRepository::new(pool)
            .create_college("col-1", "Test College")
            .await
            .unwrap();
        let repo = BatchRepository::new(pool);
        repo.create_batch("batch-1", "col-1", "2021-2025", "JOINCODE")
            .await
            .unwrap();
        repo.add_enrollment("batch-1", "EN-001").await.unwrap();
    }

    fn user_registration() -> RegisterUserRequest {
        RegisterUserRequest {
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
            password: "Passw0rd!".to_string(),
            enrollment_number: "EN-001".to_string(),
            batch_code: "JOINCODE".to_string(),
        }
    }

    #[tokio::test]
    async fn register_login_refresh_logout_cycle() {
        let pool = test_pool().await;
        seed_batch(&pool).await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let registered = service.register_user(user_registration()).await.unwrap();
        assert!(matches!(registered.principal, AuthPrincipal::User(_)));

        let login = service
            .login_user(LoginRequest {
                email: "a@x.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap();

        let refreshed = service.refresh(&login.refresh_token).await.unwrap();
        let jwt = JwtUtils::from_config(&config);
        match jwt.verify_access_token(&refreshed.access_token) {
            TokenVerification::Valid(claims) => {
                assert_eq!(claims.id, registered.principal.id());
                assert_eq!(claims.role, None);
            }
            other => panic!("expected valid token, got {other:?}"),
        }

        service.logout(Some(&login.refresh_token)).await.unwrap();
        let after_logout = service.refresh(&login.refresh_token).await;
        assert!(matches!(
            after_logout,
            Err(ServiceError::Unauthorized { token_expired: false, .. })
        ));
    }

    #[tokio::test]
    async fn logout_revokes_every_session_of_the_principal() {
        let pool = test_pool().await;
        seed_batch(&pool).await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service.register_user(user_registration()).await.unwrap();
        let login = LoginRequest {
            email: "a@x.com".to_string(),
            password: "Passw0rd!".to_string(),
        };
        let phone = service
            .login_user(login_clone(&login))
            .await
            .unwrap();
        let laptop = service
            .login_user(login_clone(&login))
            .await
            .unwrap();

        service.logout(Some(&phone.refresh_token)).await.unwrap();

        assert!(service.refresh(&phone.refresh_token).await.is_err());
        assert!(service.refresh(&laptop.refresh_token).await.is_err());
    }

    fn login_clone(req: &LoginRequest) -> LoginRequest {
        LoginRequest {
            email: req.email.clone(),
            password: req.password.clone(),
        }
    }

    #[tokio::test]
    async fn device_logout_leaves_other_sessions_usable() {
        let pool = test_pool().await;
        seed_batch(&pool).await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service.register_user(user_registration()).await.unwrap();
        let login = LoginRequest {
            email: "a@x.com".to_string(),
            password: "Passw0rd!".to_string(),
        };
        let phone = service
            .login_user(login_clone(&login))
            .await
            .unwrap();
        let laptop = service
            .login_user(login_clone(&login))
            .await
            .unwrap();

        service
            .logout_device(Some(&phone.refresh_token))
            .await
            .unwrap();

        assert!(service.refresh(&phone.refresh_token).await.is_err());
        assert!(service.refresh(&laptop.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn logout_without_token_is_idempotent_success() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service.logout(None).await.unwrap();
        service.logout(Some("never-issued")).await.unwrap();
    }

    #[tokio::test]
    async fn refresh_picks_up_a_promoted_role() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);
        let admin_service = AdminService::new(&pool);

        let root: PublicAdmin = service
            .register_admin(
                RegisterAdminRequest {
                    name: "Root".to_string(),
                    email: "root@x.com".to_string(),
                    password: "Sup3rSecret!".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        let second = service
            .register_admin(
                RegisterAdminRequest {
                    name: "Two".to_string(),
                    email: "two@x.com".to_string(),
                    password: "Sup3rSecret!".to_string(),
                },
                Some(&root),
            )
            .await
            .unwrap();

        let login = service
            .login_admin(LoginRequest {
                email: "two@x.com".to_string(),
                password: "Sup3rSecret!".to_string(),
            })
            .await
            .unwrap();

        admin_service
            .set_role(&second.id, AdminRole::Superadmin)
            .await
            .unwrap();

        // Same refresh session, but the new access token carries the
        // current role.
        let refreshed = service.refresh(&login.refresh_token).await.unwrap();
        let jwt = JwtUtils::from_config(&config);
        match jwt.verify_access_token(&refreshed.access_token) {
            TokenVerification::Valid(claims) => {
                assert_eq!(claims.role.as_deref(), Some("superadmin"));
            }
            other => panic!("expected valid token, got {other:?}"),
        }
    }
}
