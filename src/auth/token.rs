//! Signed session tokens.
//!
//! Tokens are HS256 JWTs whose payload carries `{ user: { id } }` plus the
//! usual `iat`/`exp` timestamps.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::AuthResult;
use crate::db::Id;

/// Identity embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: Id,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: u64,
    pub exp: u64,
}

/// Issues a signed credential for a user id.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Id) -> AuthResult<String>;
}

/// HMAC-SHA256 token issuer.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl JwtIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Validate signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user_id: Id) -> AuthResult<String> {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let claims = Claims {
            user: TokenUser { id: user_id },
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }
}
