use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::config::AppSettings;
use crate::errors::ApiError;
use crate::types::db::Role;
use crate::types::internal::Claims;

/// Issues and validates signed bearer tokens.
///
/// Tokens are time-limited but not revocable: a token stays valid until its
/// natural expiry even if the user is deleted or role-changed in the interim.
pub struct TokenService {
    secret_key: String,
    algorithm: Algorithm,
    default_ttl_minutes: i64,
}

impl TokenService {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            secret_key: settings.secret_key.clone(),
            algorithm: settings.algorithm,
            default_ttl_minutes: settings.access_token_ttl_minutes,
        }
    }

    /// Issue a signed token for the given subject.
    ///
    /// The role claim is informational; authorization is re-derived from the
    /// persisted user record on every request. `ttl_minutes` overrides the
    /// configured default lifetime when given.
    pub fn issue(
        &self,
        username: &str,
        role: Role,
        ttl_minutes: Option<i64>,
    ) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let ttl = ttl_minutes.unwrap_or(self.default_ttl_minutes);

        let claims = Claims {
            sub: username.to_string(),
            role: role.as_str().to_string(),
            exp: now + ttl * 60,
            iat: now,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiration and return the claims.
    pub fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::unauthenticated("Token has expired")
            }
            _ => ApiError::unauthenticated("Invalid or malformed token"),
        })?;

        Ok(token_data.claims)
    }

    /// Number of seconds a freshly issued token stays valid.
    pub fn default_ttl_seconds(&self) -> i64 {
        self.default_ttl_minutes * 60
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("default_ttl_minutes", &self.default_ttl_minutes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> AppSettings {
        AppSettings {
            database_url: "sqlite::memory:".to_string(),
            secret_key: "test-secret-key-minimum-32-characters-long".to_string(),
            algorithm: Algorithm::HS256,
            access_token_ttl_minutes: 30,
            admin_username: "admin".to_string(),
            admin_password: "admin-password".to_string(),
        }
    }

    #[test]
    fn issued_token_validates_and_carries_subject_and_role() {
        let service = TokenService::new(&test_settings());

        let token = service.issue("alice", Role::RegularUser, None).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn ttl_override_changes_expiration() {
        let service = TokenService::new(&test_settings());

        let token = service.issue("admin", Role::Admin, Some(5)).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }

    #[test]
    fn validation_fails_with_wrong_secret() {
        let service = TokenService::new(&test_settings());
        let mut other_settings = test_settings();
        other_settings.secret_key = "another-secret-key-minimum-32-chars-long".to_string();
        let other = TokenService::new(&other_settings);

        let token = service.issue("alice", Role::RegularUser, None).unwrap();
        let result = other.validate(&token);

        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[test]
    fn validation_fails_with_expired_token() {
        let service = TokenService::new(&test_settings());

        let now = Utc::now().timestamp();
        let expired_claims = Claims {
            sub: "alice".to_string(),
            role: "user".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &expired_claims,
            &EncodingKey::from_secret(test_settings().secret_key.as_bytes()),
        )
        .unwrap();

        let result = service.validate(&expired_token);

        match result {
            Err(ApiError::Unauthenticated(json)) => {
                assert_eq!(json.0.message, "Token has expired");
            }
            _ => panic!("Expected Unauthenticated error"),
        }
    }

    #[test]
    fn validation_fails_with_garbage_token() {
        let service = TokenService::new(&test_settings());

        let result = service.validate("not-a-jwt");

        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let service = TokenService::new(&test_settings());

        let debug_output = format!("{:?}", service);

        assert!(!debug_output.contains("test-secret-key"));
        assert!(debug_output.contains("<redacted>"));
    }
}
