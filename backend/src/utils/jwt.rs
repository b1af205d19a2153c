//! JWT token utilities for authentication and authorization.
//!
//! Provides access-token creation and validation. The `role` claim is the
//! sole wire-level discriminator between principal variants: absent means a
//! user token, present and non-null means an admin token.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::PrincipalType;
use crate::errors::ServiceError;

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Principal ID
    pub id: String,
    /// Admin role name; omitted entirely for user tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn principal_type(&self) -> PrincipalType {
        if self.role.is_some() {
            PrincipalType::Admin
        } else {
            PrincipalType::User
        }
    }
}

/// Three-way verification outcome. Expiry is not an error path: callers
/// react differently (expired advises refresh, invalid rejects outright).
#[derive(Debug)]
pub enum TokenVerification {
    Valid(Claims),
    Expired,
    Invalid,
}

/// JWT token utility for creating and validating access tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_seconds: i64,
}

impl JwtUtils {
    pub fn new(secret: &str, access_ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.access_token_ttl_seconds)
    }

    /// Generate a signed access token for the given principal. `role` must be
    /// `Some` exactly when the principal is an admin.
    pub fn sign_access_token(
        &self,
        principal_id: &str,
        role: Option<&str>,
    ) -> Result<String, ServiceError> {
        self.sign_with_ttl(principal_id, role, self.access_ttl_seconds)
    }

    pub(crate) fn sign_with_ttl(
        &self,
        principal_id: &str,
        role: Option<&str>,
        ttl_seconds: i64,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_seconds);

        let claims = Claims {
            id: principal_id.to_string(),
            role: role.map(str::to_string),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            ServiceError::Internal {
                source: anyhow::anyhow!("token generation failed: {e}"),
            }
        })
    }

    /// Decode and verify an access token, distinguishing a validly-signed but
    /// expired token from a malformed or tampered one.
    pub fn verify_access_token(&self, token: &str) -> TokenVerification {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => TokenVerification::Valid(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenVerification::Expired,
                _ => TokenVerification::Invalid,
            },
        }
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utils() -> JwtUtils {
        JwtUtils::new("test-secret", 3600)
    }

    #[test]
    fn round_trip_preserves_user_claims() {
        let jwt = utils();
        let token = jwt.sign_access_token("user-1", None).unwrap();

        match jwt.verify_access_token(&token) {
            TokenVerification::Valid(claims) => {
                assert_eq!(claims.id, "user-1");
                assert_eq!(claims.role, None);
                assert_eq!(claims.principal_type(), PrincipalType::User);
            }
            other => panic!("expected valid token, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_preserves_admin_role() {
        let jwt = utils();
        let token = jwt.sign_access_token("admin-1", Some("superadmin")).unwrap();

        match jwt.verify_access_token(&token) {
            TokenVerification::Valid(claims) => {
                assert_eq!(claims.id, "admin-1");
                assert_eq!(claims.role.as_deref(), Some("superadmin"));
                assert_eq!(claims.principal_type(), PrincipalType::Admin);
            }
            other => panic!("expected valid token, got {other:?}"),
        }
    }

    #[test]
    fn expired_token_is_expired_not_invalid() {
        let jwt = utils();
        let token = jwt.sign_with_ttl("user-1", None, -60).unwrap();

        assert!(matches!(
            jwt.verify_access_token(&token),
            TokenVerification::Expired
        ));
    }

    #[test]
    fn tampered_token_is_invalid_not_expired() {
        let jwt = utils();
        let token = jwt.sign_access_token("user-1", None).unwrap();

        // Corrupt one byte in the payload segment.
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            jwt.verify_access_token(&tampered),
            TokenVerification::Invalid
        ));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = utils().sign_access_token("user-1", None).unwrap();
        let other = JwtUtils::new("different-secret", 3600);

        assert!(matches!(
            other.verify_access_token(&token),
            TokenVerification::Invalid
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            utils().verify_access_token("not-a-jwt"),
            TokenVerification::Invalid
        ));
    }
}
