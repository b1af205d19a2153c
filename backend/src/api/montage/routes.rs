//! Defines the HTTP routes for montage jobs. All routes require a
//! signed-in student; jobs are private to their owner.

use super::handlers::{get_montage_job, list_montage_jobs, submit_montage};
use crate::auth::middleware::require_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn montage_router() -> Router {
    Router::new()
        .route("/", post(submit_montage))
        .route("/", get(list_montage_jobs))
        .route("/{id}", get(get_montage_job))
        .layer(middleware::from_fn(require_auth))
}
