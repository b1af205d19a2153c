//! Defines the HTTP routes for college management.
//!
//! Creation and deletion are superadmin-only; reads are open to any admin.

use super::handlers::{create_college, delete_college, get_college, list_colleges};
use crate::auth::middleware::{require_admin, require_auth, require_superadmin};
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

pub fn college_router() -> Router {
    Router::new()
        .route(
            "/",
            post(create_college).layer(middleware::from_fn(require_superadmin)),
        )
        .route(
            "/{id}",
            delete(delete_college).layer(middleware::from_fn(require_superadmin)),
        )
        .route("/", get(list_colleges))
        .route("/{id}", get(get_college))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn(require_auth))
}
