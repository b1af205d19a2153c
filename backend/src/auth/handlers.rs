//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse incoming requests, delegate to `auth::service`, and
//! translate the outcome into responses plus cookie mutations. Access tokens
//! travel in the body and as a cookie; refresh tokens are cookie-only.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::services::admin_service::AdminService;
use crate::utils::cookies::{
    REFRESH_COOKIE, access_cookie, clear_access_cookie, clear_refresh_cookie, refresh_cookie,
};
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use axum_extra::extract::CookieJar;
use sqlx::SqlitePool;

fn login_cookies(jar: CookieJar, response: &LoginResponse, config: &Config) -> CookieJar {
    jar.add(access_cookie(
        &response.access_token,
        response.expires_in,
        config.cookie_secure,
    ))
    .add(refresh_cookie(
        &response.refresh_token,
        config.refresh_session_ttl_days,
        config.cookie_secure,
    ))
}

/// Handle user registration; a successful registration logs the user in.
#[axum::debug_handler]
pub async fn register_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<LoginResponse>>), (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.register_user(payload).await {
        Ok(response) => {
            let jar = login_cookies(jar, &response, &config);
            Ok((
                jar,
                ResponseJson(ApiResponse::success(response, "Registered successfully")),
            ))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<LoginResponse>>), (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.login_user(payload).await {
        Ok(response) => {
            let jar = login_cookies(jar, &response, &config);
            Ok((
                jar,
                ResponseJson(ApiResponse::success(response, "Logged in successfully")),
            ))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle admin registration. Runs behind `optional_auth`: the bootstrap
/// path (empty admins table) is unauthenticated by design.
#[axum::debug_handler]
pub async fn register_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Extension(caller): Extension<Option<AuthPrincipal>>,
    Json(payload): Json<RegisterAdminRequest>,
) -> Result<ResponseJson<ApiResponse<crate::database::models::PublicAdmin>>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);
    let caller_admin = caller.as_ref().and_then(|principal| principal.as_admin());

    match service.register_admin(payload, caller_admin).await {
        Ok(admin) => Ok(ResponseJson(ApiResponse::success(
            admin,
            "Admin registered successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Change another admin's role. Superadmin-only via router middleware.
#[axum::debug_handler]
pub async fn set_admin_role(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<SetAdminRoleRequest>,
) -> Result<ResponseJson<ApiResponse<crate::database::models::PublicAdmin>>, (StatusCode, String)> {
    let service = AdminService::new(&pool);

    match service.set_role(&id, payload.role).await {
        Ok(admin) => Ok(ResponseJson(ApiResponse::success(
            admin.into(),
            "Admin role updated",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle admin login request
#[axum::debug_handler]
pub async fn login_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<LoginResponse>>), (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.login_admin(payload).await {
        Ok(response) => {
            let jar = login_cookies(jar, &response, &config);
            Ok((
                jar,
                ResponseJson(ApiResponse::success(response, "Logged in successfully")),
            ))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Exchange the refresh cookie for a new access token. Stateless with
/// respect to the access token; only the refresh cookie is consulted.
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
) -> Result<(CookieJar, ResponseJson<ApiResponse<RefreshTokenResponse>>), (StatusCode, String)> {
    let Some(cookie) = jar.get(REFRESH_COOKIE) else {
        return Err(service_error_to_http(
            crate::errors::ServiceError::unauthorized("missing refresh token"),
        ));
    };
    let token = cookie.value().to_string();

    let service = AuthService::new(&pool, &config);
    match service.refresh(&token).await {
        Ok(response) => {
            let jar = jar.add(access_cookie(
                &response.access_token,
                response.expires_in,
                config.cookie_secure,
            ));
            Ok((
                jar,
                ResponseJson(ApiResponse::success(response, "Token refreshed")),
            ))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Principal-wide logout: revokes every session the refresh cookie's owner
/// holds. Without a cookie this is an idempotent success. Cookies are
/// cleared unconditionally either way.
#[axum::debug_handler]
pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
) -> Result<(CookieJar, ResponseJson<ApiResponse<()>>), (StatusCode, String)> {
    let token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let service = AuthService::new(&pool, &config);
    if let Err(error) = service.logout(token.as_deref()).await {
        return Err(service_error_to_http(error));
    }

    let jar = jar.add(clear_access_cookie()).add(clear_refresh_cookie());
    Ok((
        jar,
        ResponseJson(ApiResponse::success((), "Logged out successfully")),
    ))
}

/// Device-local logout: invalidates only the presented refresh token.
#[axum::debug_handler]
pub async fn logout_device(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
) -> Result<(CookieJar, ResponseJson<ApiResponse<()>>), (StatusCode, String)> {
    let token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let service = AuthService::new(&pool, &config);
    if let Err(error) = service.logout_device(token.as_deref()).await {
        return Err(service_error_to_http(error));
    }

    let jar = jar.add(clear_access_cookie()).add(clear_refresh_cookie());
    Ok((
        jar,
        ResponseJson(ApiResponse::success((), "Logged out successfully")),
    ))
}

/// Get the authenticated principal's own profile.
#[axum::debug_handler]
pub async fn me(
    Extension(principal): Extension<AuthPrincipal>,
) -> ResponseJson<ApiResponse<AuthPrincipal>> {
    ResponseJson(ApiResponse::ok(principal))
}
