//! Middleware for protecting authenticated routes and handling authorization.
//!
//! The gate extracts a bearer credential (access cookie first, then the
//! Authorization header), verifies it, resolves the owning principal and
//! attaches it to the request. Expired tokens are rejected with a
//! distinguishable signal so clients can run the refresh flow; role gates
//! compose after the main gate. A credential problem is never a 500.

use crate::api::common::service_error_to_http;
use crate::auth::models::AuthPrincipal;
use crate::config::Config;
use crate::database::models::PrincipalType;
use crate::errors::ServiceError;
use crate::repositories::admin_repository::AdminRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::cookies::ACCESS_COOKIE;
use crate::utils::jwt::{Claims, JwtUtils, TokenVerification};
use axum::{
    extract::{Extension, Request},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use sqlx::SqlitePool;

/// Terminal rejection states of the authentication gate.
#[derive(Debug)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    PrincipalNotFound,
    Forbidden(&'static str),
    Internal(anyhow::Error),
}

impl From<AuthRejection> for ServiceError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::MissingToken => ServiceError::unauthorized("missing token"),
            AuthRejection::InvalidToken => ServiceError::unauthorized("invalid token"),
            AuthRejection::ExpiredToken => ServiceError::token_expired(),
            AuthRejection::PrincipalNotFound => ServiceError::unauthorized("principal not found"),
            AuthRejection::Forbidden(message) => ServiceError::forbidden(message),
            AuthRejection::Internal(source) => ServiceError::Internal { source },
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        service_error_to_http(self.into()).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Access token from the cookie, falling back to the Authorization header.
/// The cookie wins when both are present.
fn extract_access_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(headers))
}

async fn resolve_principal(
    pool: &SqlitePool,
    claims: &Claims,
) -> Result<AuthPrincipal, AuthRejection> {
    let principal = match claims.principal_type() {
        PrincipalType::Admin => AdminRepository::new(pool)
            .get_admin_by_id(&claims.id)
            .await
            .map_err(AuthRejection::Internal)?
            .map(|admin| AuthPrincipal::Admin(admin.into())),
        PrincipalType::User => UserRepository::new(pool)
            .get_user_by_id(&claims.id)
            .await
            .map_err(AuthRejection::Internal)?
            .map(|user| AuthPrincipal::User(user.into())),
    };

    principal.ok_or(AuthRejection::PrincipalNotFound)
}

/// Authentication gate: every protected route runs through here.
pub async fn require_auth(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token =
        extract_access_token(&jar, request.headers()).ok_or(AuthRejection::MissingToken)?;

    let jwt_utils = JwtUtils::from_config(&config);
    let claims = match jwt_utils.verify_access_token(&token) {
        TokenVerification::Valid(claims) => claims,
        TokenVerification::Expired => return Err(AuthRejection::ExpiredToken),
        TokenVerification::Invalid => return Err(AuthRejection::InvalidToken),
    };

    let principal = resolve_principal(&pool, &claims).await?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Optional authentication: attaches `Option<AuthPrincipal>` without failing
/// the request. Used by admin registration, whose bootstrap path is
/// deliberately unauthenticated.
pub async fn optional_auth(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let principal = match extract_access_token(&jar, request.headers()) {
        Some(token) => {
            let jwt_utils = JwtUtils::from_config(&config);
            match jwt_utils.verify_access_token(&token) {
                TokenVerification::Valid(claims) => resolve_principal(&pool, &claims).await.ok(),
                _ => None,
            }
        }
        None => None,
    };

    // Always insert the Option, even when it's None.
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Admin role gate; composes after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthRejection> {
    let principal = request
        .extensions()
        .get::<AuthPrincipal>()
        .ok_or(AuthRejection::MissingToken)?;

    if principal.as_admin().is_none() {
        return Err(AuthRejection::Forbidden("admin access required"));
    }

    Ok(next.run(request).await)
}

/// Superadmin role gate; composes after `require_auth`.
pub async fn require_superadmin(request: Request, next: Next) -> Result<Response, AuthRejection> {
    let principal = request
        .extensions()
        .get::<AuthPrincipal>()
        .ok_or(AuthRejection::MissingToken)?;

    if !principal.is_superadmin() {
        return Err(AuthRejection::Forbidden("superadmin access required"));
    }

    Ok(next.run(request).await)
}
