//! Main entry point for the Gradbook backend.
//!
//! This file initializes the Axum web server, sets up database connections,
//! and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    spawn_session_sweeper(pool.clone(), config.refresh_session_ttl_days);

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/college", api::college::routes::college_router())
        .nest("/api/batch", api::batch::routes::batch_router())
        .nest("/api/entry", api::entry::routes::entry_router())
        .nest("/api/message", api::message::routes::message_router())
        .nest("/api/montage", api::montage::routes::montage_router())
        .layer(Extension(pool))
        .layer(Extension(config.clone()));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting Gradbook server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

/// Periodically deletes expired refresh sessions so the table does not grow
/// without bound.
fn spawn_session_sweeper(pool: sqlx::SqlitePool, refresh_ttl_days: i64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let manager = services::session_manager::SessionManager::new(&pool, refresh_ttl_days);
            match manager.sweep_expired().await {
                Ok(removed) if removed > 0 => info!("swept {removed} expired refresh sessions"),
                Ok(_) => {}
                Err(error) => tracing::warn!("session sweep failed: {error}"),
            }
        }
    });
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Gradbook Backend",
            "version": "0.1.0"
        }),
        "Welcome to the Gradbook API",
    ))
}
