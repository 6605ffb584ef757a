//! Database utility functions.

use rand::Rng;
use sqlx::types::chrono::Utc;

/// Upper bound (exclusive) for default avatar seeds.
const AVATAR_SEED_RANGE: u32 = 100;

/// Get current datetime as string in SQLite format
pub fn current_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Default avatar for a seed. Gravatar renders an identicon per seed.
pub fn gravatar_url(seed: u32) -> String {
    format!("https://secure.gravatar.com/avatar/{}?s=164&d=identicon", seed)
}

/// Pick a random avatar seed for a newly registered user.
pub fn random_avatar_seed() -> u32 {
    rand::thread_rng().gen_range(0..AVATAR_SEED_RANGE)
}
