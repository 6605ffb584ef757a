//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing the API layer.

use crate::db::{
    DbResult,
    models::{
        Id, NewPost, NewUser, PostOverview, PostQuery, UserCredentials, UserProfile, UserStats,
        UserSummary,
    },
};

/// Repository for Post operations.
pub trait PostRepository {
    /// Create a post, insert its tag if absent, and link the two.
    ///
    /// Returns the new post id. All statements share one transaction.
    async fn create(&self, post: &NewPost, tag_description: Option<&str>) -> DbResult<Id>;

    /// Delete a post together with its tag links, answers, and comments.
    async fn remove(&self, id: Id) -> DbResult<()>;

    /// Bump the view counter. Returns false when no post matched.
    async fn increment_views(&self, id: Id) -> DbResult<bool>;

    /// Get one post with owner, tag, and engagement counts.
    async fn get(&self, id: Id) -> DbResult<PostOverview>;

    /// List posts with owner, tag, and engagement counts.
    async fn list(&self, query: &PostQuery) -> DbResult<Vec<PostOverview>>;
}

/// Repository for User operations.
pub trait UserRepository {
    /// Insert a user and return its id.
    async fn create(&self, user: &NewUser) -> DbResult<Id>;

    /// Look up login credentials by username.
    async fn find_credentials(&self, username: &str) -> DbResult<Option<UserCredentials>>;

    /// Bump the view counter. Returns false when no user matched.
    async fn increment_views(&self, id: Id) -> DbResult<bool>;

    /// Get the minimal profile for a user.
    async fn get_profile(&self, id: Id) -> DbResult<UserProfile>;

    /// Get one user with post, tag, answer, and comment counts.
    async fn get_stats(&self, id: Id) -> DbResult<UserStats>;

    /// List every user with post and tag counts, most posts first.
    async fn list(&self) -> DbResult<Vec<UserSummary>>;
}

/// Combined database interface.
pub trait Database: Send + Sync {
    type Posts<'a>: PostRepository
    where
        Self: 'a;
    type Users<'a>: UserRepository
    where
        Self: 'a;

    /// Run pending migrations.
    async fn migrate(&self) -> DbResult<()>;

    /// Get the post repository.
    fn posts(&self) -> Self::Posts<'_>;

    /// Get the user repository.
    fn users(&self) -> Self::Users<'_>;
}
