//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the yearbook API domains,
//! excluding core authentication routes which are handled separately.

pub mod batch;
pub mod college;
pub mod common;
pub mod entry;
pub mod message;
pub mod montage;
