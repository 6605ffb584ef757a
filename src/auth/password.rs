//! bcrypt password hashing.
//!
//! bcrypt is deliberately slow, so both directions run on the blocking
//! thread pool instead of stalling the async runtime.

use super::AuthResult;

/// Hash a password with a fresh salt at the given cost.
pub async fn hash_password(password: &str, cost: u32) -> AuthResult<String> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// Check a password against a stored bcrypt hash.
pub async fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}
