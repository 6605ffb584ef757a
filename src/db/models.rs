//! Domain models for the forum database.
//!
//! Input types describe what callers hand to the repositories; the
//! projection types mirror the aggregate read queries column for column.

use serde::{Deserialize, Serialize};

// =============================================================================
// Query Types
// =============================================================================

/// Ordering applied to post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOrder {
    /// Newest posts first.
    #[default]
    Newest,
    /// Posts with the most answers plus comments first.
    Engagement,
}

/// Query for post listings - ordering + optional tag filter.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub order: PostOrder,
    /// Only posts linked to this tag name.
    pub tagname: Option<String>,
}

impl PostQuery {
    pub fn top() -> Self {
        Self {
            order: PostOrder::Engagement,
            tagname: None,
        }
    }

    pub fn tagged(tagname: impl Into<String>) -> Self {
        Self {
            order: PostOrder::Newest,
            tagname: Some(tagname.into()),
        }
    }
}

// =============================================================================
// Posts
// =============================================================================

/// Numeric row id used by every table.
pub type Id = i64;

/// Input for creating a post together with its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: Id,
    pub tagname: String,
}

/// A post joined with its owner, tag, and engagement counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOverview {
    pub id: Id,
    pub user_id: Id,
    pub username: String,
    pub tag_id: Id,
    pub tagname: String,
    pub description: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub views: i64,
    pub answer_count: i64,
    pub comment_count: i64,
}

// =============================================================================
// Users
// =============================================================================

/// Input for creating a user. `password` must already be hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub gravatar: String,
}

/// Stored login credentials for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub id: Id,
    pub username: String,
    /// bcrypt hash
    pub password: String,
}

/// Minimal profile used for identity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Id,
    pub username: String,
    pub gravatar: String,
    pub views: i64,
    pub created_at: String,
}

/// A user with post and tag counts, as listed on the users page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Id,
    pub username: String,
    pub gravatar: String,
    pub views: i64,
    pub created_at: String,
    pub posts_count: i64,
    pub tags_count: i64,
}

/// A single user with every derived count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub id: Id,
    pub username: String,
    pub gravatar: String,
    pub views: i64,
    pub created_at: String,
    pub posts_count: i64,
    pub tags_count: i64,
    pub answers_count: i64,
    pub comments_count: i64,
}
