//! HS256 bearer token issuance and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::kind::AccountKind;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, mis-signed, or expired.
    #[error("invalid or expired token")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Credential (and identity) id.
    pub sub: Uuid,
    pub email: String,
    pub role: AccountKind,
    pub iat: i64,
    pub exp: i64,
    /// Keeps tokens minted in the same second distinct in the session registry.
    pub jti: Uuid,
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let key = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            ttl_seconds,
        }
    }

    #[must_use]
    pub const fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Sign a token for `subject` that expires after the configured TTL.
    ///
    /// # Errors
    /// Returns [`TokenError::Encode`] if signing fails.
    pub fn issue(
        &self,
        subject: Uuid,
        email: &str,
        role: AccountKind,
    ) -> Result<(String, Claims), TokenError> {
        self.issue_with_ttl(subject, email, role, self.ttl_seconds)
    }

    /// Same as [`Self::issue`] with an explicit TTL, which may be negative.
    ///
    /// # Errors
    /// Returns [`TokenError::Encode`] if signing fails.
    pub fn issue_with_ttl(
        &self,
        subject: Uuid,
        email: &str,
        role: AccountKind,
        ttl_seconds: i64,
    ) -> Result<(String, Claims), TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject,
            email: email.to_string(),
            role,
            iat: now,
            exp: now.saturating_add(ttl_seconds),
            jti: Uuid::new_v4(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok((token, claims))
    }

    /// Check signature and expiry. Never touches the session registry.
    ///
    /// # Errors
    /// Returns [`TokenError::Invalid`] for any token that does not verify.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
