//! Collection of general utility functions shared across the backend.

pub mod cookies;
pub mod crypto;
pub mod generate_random_string;
pub mod jwt;
