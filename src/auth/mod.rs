//! Credential helpers: bcrypt password hashing and signed session tokens.

mod error;
mod password;
mod token;


pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
#[cfg(test)]
pub use token::MockTokenIssuer;
pub use token::{Claims, JwtIssuer, TokenIssuer, TokenUser};
