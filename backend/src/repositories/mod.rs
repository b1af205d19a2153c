//! Data-access layer: one repository per table.
//!
//! Repositories own all SQL; services never touch another component's
//! storage directly.

pub mod admin_repository;
pub mod batch_repository;
pub mod college_repository;
pub mod entry_repository;
pub mod message_repository;
pub mod montage_repository;
pub mod session_repository;
pub mod user_repository;
