use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use thiserror::Error;

use crate::auth::Claims;

/// A verified caller identity. `subject` is the stable unique identifier
/// the token's issuer assigned to the user; it is the scoping key for
/// every data access downstream.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
}

/// Token verification failure. The detail string is for server-side logs;
/// clients always see the same 401 regardless of the reason.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token rejected: {0}")]
    Rejected(String),
}

/// Adapter over the external token-verification service: one verification
/// call per request, no caching, no retries. Nothing outside the token
/// itself is trusted.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// HS256 shared-secret verifier. `Validation::default()` enforces `exp`,
/// so expired tokens fail without extra checks.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| VerifyError::Rejected(e.to_string()))?;

        Ok(Identity {
            subject: token_data.claims.sub,
        })
    }
}
