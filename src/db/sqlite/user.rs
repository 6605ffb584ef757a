//! SQLite UserRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::map_sqlx_error;
use crate::db::utils::current_timestamp;
use crate::db::{
    DbError, DbResult, Id, NewUser, UserCredentials, UserProfile, UserRepository, UserStats,
    UserSummary,
};

/// SQLx-backed user repository.
pub struct SqliteUserRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> UserRepository for SqliteUserRepository<'a> {
    async fn create(&self, user: &NewUser) -> DbResult<Id> {
        let result = sqlx::query(
            "INSERT INTO users (username, password, gravatar, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.gravatar)
        .bind(current_timestamp())
        .execute(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_credentials(&self, username: &str) -> DbResult<Option<UserCredentials>> {
        let row = sqlx::query("SELECT id, username, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|row| UserCredentials {
            id: row.get("id"),
            username: row.get("username"),
            password: row.get("password"),
        }))
    }

    async fn increment_views(&self, id: Id) -> DbResult<bool> {
        let result = sqlx::query("UPDATE users SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_profile(&self, id: Id) -> DbResult<UserProfile> {
        let row = sqlx::query(
            "SELECT id, username, gravatar, views, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let row = row.ok_or_else(|| DbError::not_found("User", id))?;

        Ok(UserProfile {
            id: row.get("id"),
            username: row.get("username"),
            gravatar: row.get("gravatar"),
            views: row.get("views"),
            created_at: row.get("created_at"),
        })
    }

    async fn get_stats(&self, id: Id) -> DbResult<UserStats> {
        // Answers and comments are counted by authorship, posts and tags
        // through the posts the user owns.
        let row = sqlx::query(
            r#"
            SELECT
                users.id AS id,
                users.username AS username,
                users.gravatar AS gravatar,
                users.views AS views,
                users.created_at AS created_at,
                COUNT(DISTINCT posts.id) AS posts_count,
                COUNT(DISTINCT tags.tagname) AS tags_count,
                COUNT(DISTINCT answers.id) AS answers_count,
                COUNT(DISTINCT comments.id) AS comments_count
            FROM users
                LEFT JOIN posts ON posts.user_id = users.id
                LEFT JOIN posttag ON posttag.post_id = posts.id
                LEFT JOIN tags ON tags.id = posttag.tag_id
                LEFT JOIN answers ON answers.user_id = users.id
                LEFT JOIN comments ON comments.user_id = users.id
            WHERE users.id = ?
            GROUP BY users.id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let row = row.ok_or_else(|| DbError::not_found("User", id))?;

        Ok(UserStats {
            id: row.get("id"),
            username: row.get("username"),
            gravatar: row.get("gravatar"),
            views: row.get("views"),
            created_at: row.get("created_at"),
            posts_count: row.get("posts_count"),
            tags_count: row.get("tags_count"),
            answers_count: row.get("answers_count"),
            comments_count: row.get("comments_count"),
        })
    }

    async fn list(&self) -> DbResult<Vec<UserSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT
                users.id AS id,
                users.username AS username,
                users.gravatar AS gravatar,
                users.views AS views,
                users.created_at AS created_at,
                COUNT(DISTINCT posts.id) AS posts_count,
                COUNT(DISTINCT tags.tagname) AS tags_count
            FROM users
                LEFT JOIN posts ON posts.user_id = users.id
                LEFT JOIN posttag ON posttag.post_id = posts.id
                LEFT JOIN tags ON tags.id = posttag.tag_id
            GROUP BY users.id
            ORDER BY posts_count DESC, users.id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                id: row.get("id"),
                username: row.get("username"),
                gravatar: row.get("gravatar"),
                views: row.get("views"),
                created_at: row.get("created_at"),
                posts_count: row.get("posts_count"),
                tags_count: row.get("tags_count"),
            })
            .collect())
    }
}
