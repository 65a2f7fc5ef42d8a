//! JWT session tokens using HS256.
//!
//! The platform issues short-lived bearer tokens after a successful organizer
//! or admin login. Tokens carry the subject id and a role claim; the role is
//! re-checked by the route guards, so a forged role never grants access
//! without a matching signature.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Role carried inside a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Organizer,
    Admin,
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: organizer id, or the admin username for the admin role
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token identifier
    pub jti: String,
    /// Role granted by this token
    pub role: Role,
}

/// Default leeway in seconds for clock skew tolerance.
const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Signs and validates session tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Token expiration in seconds
    pub expiry_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("expiry_secs", &self.expiry_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
        }
    }

    /// Issues a token for the given subject and role.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + Duration::seconds(self.expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            role,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingError(e.to_string()))
    }

    /// Validates a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = DEFAULT_LEEWAY_SECS;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken,
            })
    }
}
