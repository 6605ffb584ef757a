//! SQLite connection pool and migration management.

use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{debug, instrument};

use super::post::SqlitePostRepository;
use super::user::SqliteUserRepository;
use crate::db::{Database, DbError, DbResult};

// Embed migrations from data/sql/sqlite/ at compile time
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("data/sql/sqlite");

const MAX_CONNECTIONS: u32 = 5;

/// SQLite database implementation.
///
/// Owns the connection pool. Repositories borrow the pool, so the
/// database must outlive every repository handed out by it.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (or create) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = Self::base_options()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        debug!(path = %path.as_ref().display(), "opened database");
        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Limited to one connection that never expires; every new connection
    /// to `:memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> DbResult<Self> {
        let options = Self::base_options().filename(":memory:");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(1500))
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection. Used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Database for SqliteDatabase {
    type Posts<'a> = SqlitePostRepository<'a>;
    type Users<'a> = SqliteUserRepository<'a>;

    #[instrument(skip(self))]
    async fn migrate(&self) -> DbResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    fn posts(&self) -> Self::Posts<'_> {
        SqlitePostRepository { pool: &self.pool }
    }

    fn users(&self) -> Self::Users<'_> {
        SqliteUserRepository { pool: &self.pool }
    }
}
