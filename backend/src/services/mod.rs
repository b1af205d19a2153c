//! Business-logic services sitting between the API layer and repositories.

pub mod admin_service;
pub mod batch_service;
pub mod college_service;
pub mod entry_service;
pub mod message_service;
pub mod montage_service;
pub mod session_manager;
pub mod user_service;
