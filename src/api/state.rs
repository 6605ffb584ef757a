//! Application state shared by every API operation.

use std::sync::Arc;

use crate::auth::{JwtIssuer, TokenIssuer};
use crate::config::AuthConfig;
use crate::db::Database;

/// Shared application state.
///
/// Generic over `D: Database` and `T: TokenIssuer` so tests can swap in an
/// in-memory database or a mocked issuer. Dependencies are injected via the
/// constructor, not created internally.
pub struct AppState<D: Database, T: TokenIssuer = JwtIssuer> {
    db: Arc<D>,
    tokens: Arc<T>,
    bcrypt_cost: u32,
}

// Manual Clone impl - only the Arcs need cloning, not D or T
impl<D: Database, T: TokenIssuer> Clone for AppState<D, T> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            tokens: Arc::clone(&self.tokens),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

impl<D: Database, T: TokenIssuer> AppState<D, T> {
    pub fn new(db: D, tokens: T, bcrypt_cost: u32) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            bcrypt_cost,
        }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Get the token issuer.
    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    /// bcrypt cost for newly hashed passwords.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

impl<D: Database> AppState<D, JwtIssuer> {
    /// Build state with a JWT issuer from auth settings.
    pub fn from_config(db: D, config: &AuthConfig) -> Self {
        Self::new(
            db,
            JwtIssuer::new(&config.jwt_secret, config.token_ttl_secs),
            config.bcrypt_cost,
        )
    }
}
