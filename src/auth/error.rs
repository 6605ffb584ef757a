//! Auth error types.

use miette::Diagnostic;
use thiserror::Error;

/// Failures while hashing passwords or handling tokens.
#[derive(Error, Diagnostic, Debug)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    #[diagnostic(code(forum::auth::hash))]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    #[diagnostic(code(forum::auth::token))]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Background hashing task failed: {0}")]
    #[diagnostic(code(forum::auth::join))]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
