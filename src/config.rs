//! Runtime configuration.
//!
//! XDG-compliant path resolution for the database file, plus the settings
//! the auth helpers need.

use std::env;
use std::path::PathBuf;

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Directory name under the XDG data home.
const APP_DIR: &str = "forum";

/// bcrypt work factor used for new passwords.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Token lifetime in seconds (ten hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 36_000;

/// Get XDG-compliant data directory.
///
/// # Returns
/// `$XDG_DATA_HOME/forum`, else `~/.local/share/forum`, else `./forum`
/// when neither variable is set.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|_| PathBuf::from("."));

    data_home.join(APP_DIR)
}

/// Get default database file path (data_dir/forum.db).
pub fn get_db_path() -> PathBuf {
    get_data_dir().join("forum.db")
}

/// Settings for password hashing and token signing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,
    /// bcrypt cost factor.
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Random 64-character alphanumeric signing secret.
pub fn generate_jwt_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
