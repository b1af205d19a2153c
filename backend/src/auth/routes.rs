//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle login, registration, token refresh and logout for
//! both principal variants. Designed to be nested into the main router.

use crate::auth::handlers::*;
use crate::auth::middleware::{optional_auth, require_auth, require_superadmin};
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/user/register", post(register_user))
        .route("/user/login", post(login_user))
        .route(
            "/admin/register",
            post(register_admin).layer(middleware::from_fn(optional_auth)),
        )
        .route("/admin/login", post(login_admin))
        .route(
            "/admin/{id}/role",
            post(set_admin_role)
                .layer(middleware::from_fn(require_superadmin))
                .layer(middleware::from_fn(require_auth)),
        )
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/logout-device", post(logout_device))
        .route("/me", get(me).layer(middleware::from_fn(require_auth)))
}
