use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

pub mod verifier;

pub use verifier::{Identity, IdentityVerifier, JwtVerifier, VerifyError};

/// Claims carried by a bearer token. The service only ever reads `sub`;
/// issuing tokens is the identity provider's job, not this API's.
/// Generation lives here for the test suite and operator tooling.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: subject.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_rejects_empty_secret() {
        let claims = Claims::new("user-1");
        assert!(matches!(
            generate_jwt(&claims, ""),
            Err(JwtError::InvalidSecret)
        ));
    }

    #[tokio::test]
    async fn test_generate_then_verify_roundtrip() {
        let claims = Claims::new("firebase-uid-abc");
        let token = generate_jwt(&claims, "s3cret").unwrap();

        let verifier = JwtVerifier::new("s3cret");
        let identity = verifier.verify(&token).await.unwrap();
        assert_eq!(identity.subject, "firebase-uid-abc");
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let token = generate_jwt(&Claims::new("user-1"), "s3cret").unwrap();

        let verifier = JwtVerifier::new("other-secret");
        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "user-1".to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = generate_jwt(&claims, "s3cret").unwrap();

        let verifier = JwtVerifier::new("s3cret");
        assert!(verifier.verify(&token).await.is_err());
    }
}
