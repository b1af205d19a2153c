//! HTTP-only auth cookie builders.
//!
//! The access cookie mirrors the access-token TTL; the refresh cookie lives
//! as long as the refresh session. Both are cleared unconditionally on logout.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "gradbook_access";
/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "gradbook_refresh";

pub fn access_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

pub fn refresh_cookie(token: &str, max_age_days: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(max_age_days))
        .build()
}

pub fn clear_access_cookie() -> Cookie<'static> {
    Cookie::build((ACCESS_COOKIE.to_string(), String::new()))
        .http_only(true)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

pub fn clear_refresh_cookie() -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE.to_string(), String::new()))
        .http_only(true)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
