//! Database abstraction layer.
//!
//! Trait-based abstractions for forum data access, with SQLite as the
//! shipped backend.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities and aggregate projections (posts, users)
//! - `repository`: Trait definitions for data access
//! - `sqlite`: SQLx-backed implementation

mod error;
mod models;
mod repository;
mod sqlite;
pub mod utils;


pub use error::{DbError, DbResult};
pub use models::*;
pub use repository::*;
pub use sqlite::{SqliteDatabase, SqlitePostRepository, SqliteUserRepository};
