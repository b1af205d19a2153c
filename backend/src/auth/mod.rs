//! Authentication module: dual-principal login, token issuance, refresh
//! sessions, and the authorization middleware gating every other route.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
