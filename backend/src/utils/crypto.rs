//! Password hashing helpers.
//!
//! All password material is hashed with bcrypt before it reaches a
//! repository; plaintext passwords are never persisted or logged.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| ServiceError::Internal {
        source: anyhow::anyhow!("password hashing failed: {e}"),
    })
}

/// Verify a plaintext password against a stored bcrypt hash.
pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<bool> {
    verify(password, password_hash).map_err(|e| ServiceError::Internal {
        source: anyhow::anyhow!("password verification failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_equals_plaintext() {
        let hashed = hash_password("Passw0rd!").unwrap();
        assert_ne!(hashed, "Passw0rd!");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn verify_accepts_only_the_original_plaintext() {
        let hashed = hash_password("Passw0rd!").unwrap();
        assert!(verify_password("Passw0rd!", &hashed).unwrap());
        assert!(!verify_password("passw0rd!", &hashed).unwrap());
        assert!(!verify_password("", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("Passw0rd!").unwrap();
        let b = hash_password("Passw0rd!").unwrap();
        assert_ne!(a, b);
    }
}
