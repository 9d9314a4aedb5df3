//! Bearer token issuing and verification
//!
//! Tokens are HS256 JWTs whose subject is the user's email. Signup tokens also
//! carry the learner's experience level so the frontend can personalize
//! content without another round trip.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Token type reported to clients alongside the token
pub const TOKEN_TYPE: &str = "bearer";

/// Claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the user the token was issued to
    pub sub: String,
    /// Experience level supplied at signup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature, algorithm, structure or expiry check failed
    #[error("Invalid or expired token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Signing failed
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 tokens with a shared secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::minutes(config.token_expire_minutes),
        )
    }

    /// Sign a token for `subject`, optionally tagged with an experience level.
    pub fn issue(&self, subject: &str, level: Option<&str>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            level: level.map(str::to_string),
            exp: (Utc::now() + self.lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::minutes(30))
    }

    #[test]
    fn test_issue_then_verify_carries_claims() {
        let tokens = service();

        let token = tokens.issue("test@example.com", Some("beginner")).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, "test@example.com");
        assert_eq!(claims.level.as_deref(), Some("beginner"));
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_login_token_has_no_level() {
        let tokens = service();

        let token = tokens.issue("test@example.com", None).unwrap();

        assert!(tokens.verify(&token).unwrap().level.is_none());
    }

    #[test]
    fn test_verify_rejects_foreign_secret() {
        let token = TokenService::new("other-secret", Duration::minutes(30))
            .issue("test@example.com", None)
            .unwrap();

        assert!(matches!(service().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Beyond the default 60 second leeway.
        let expired = TokenService::new("test-secret", Duration::minutes(-5))
            .issue("test@example.com", None)
            .unwrap();

        assert!(service().verify(&expired).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(service().verify("not.a.token").is_err());
    }

    #[test]
    fn test_from_config_uses_lifetime() {
        let config = AuthConfig {
            jwt_secret: "cfg".to_string(),
            token_expire_minutes: 1,
        };
        let tokens = TokenService::from_config(&config);

        let claims = tokens.verify(&tokens.issue("a@b.co", None).unwrap()).unwrap();

        assert!(claims.exp <= (Utc::now() + Duration::minutes(1)).timestamp());
    }
}
