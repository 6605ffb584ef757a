//! SQLite PostRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{build_post_order_clause, map_sqlx_error};
use crate::db::utils::current_timestamp;
use crate::db::{DbError, DbResult, Id, NewPost, PostOverview, PostQuery, PostRepository};

/// Post joined with owner and tag, plus distinct answer/comment counts.
/// Callers append WHERE, GROUP BY and ORDER BY.
const POST_OVERVIEW_SELECT: &str = "\
    SELECT \
        posts.id AS id, \
        posts.user_id AS user_id, \
        users.username AS username, \
        posttag.tag_id AS tag_id, \
        tags.tagname AS tagname, \
        tags.description AS description, \
        posts.title AS title, \
        posts.body AS body, \
        posts.created_at AS created_at, \
        posts.views AS views, \
        COUNT(DISTINCT answers.id) AS answer_count, \
        COUNT(DISTINCT comments.id) AS comment_count \
    FROM posts \
        JOIN posttag ON posts.id = posttag.post_id \
        JOIN tags ON posttag.tag_id = tags.id \
        JOIN users ON posts.user_id = users.id \
        LEFT JOIN answers ON answers.post_id = posts.id \
        LEFT JOIN comments ON comments.post_id = posts.id";

/// SQLx-backed post repository.
pub struct SqlitePostRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn post_from_row(row: &SqliteRow) -> PostOverview {
    PostOverview {
        id: row.get("id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        tag_id: row.get("tag_id"),
        tagname: row.get("tagname"),
        description: row.get("description"),
        title: row.get("title"),
        body: row.get("body"),
        created_at: row.get("created_at"),
        views: row.get("views"),
        answer_count: row.get("answer_count"),
        comment_count: row.get("comment_count"),
    }
}

impl<'a> PostRepository for SqlitePostRepository<'a> {
    async fn create(&self, post: &NewPost, tag_description: Option<&str>) -> DbResult<Id> {
        // Post, tag and link land together or not at all
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let post_id = sqlx::query(
            "INSERT INTO posts (title, body, user_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.user_id)
        .bind(current_timestamp())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?
        .last_insert_rowid();

        sqlx::query(
            "INSERT INTO tags (tagname, description) VALUES (?, ?) ON CONFLICT(tagname) DO NOTHING",
        )
        .bind(&post.tagname)
        .bind(tag_description)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let tag_id: Id = sqlx::query_scalar("SELECT id FROM tags WHERE tagname = ?")
            .bind(&post.tagname)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO posttag (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(post_id)
    }

    async fn remove(&self, id: Id) -> DbResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Children first so foreign keys never dangle
        for sql in [
            "DELETE FROM posttag WHERE post_id = ?",
            "DELETE FROM comments WHERE post_id = ?",
            "DELETE FROM answers WHERE post_id = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Post", id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn increment_views(&self, id: Id) -> DbResult<bool> {
        let result = sqlx::query("UPDATE posts SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: Id) -> DbResult<PostOverview> {
        let sql = format!("{} WHERE posts.id = ? GROUP BY posts.id", POST_OVERVIEW_SELECT);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(post_from_row)
            .ok_or_else(|| DbError::not_found("Post", id))
    }

    async fn list(&self, query: &PostQuery) -> DbResult<Vec<PostOverview>> {
        let where_clause = if query.tagname.is_some() {
            "WHERE tags.tagname = ?"
        } else {
            ""
        };

        let sql = format!(
            "{} {} GROUP BY posts.id {}",
            POST_OVERVIEW_SELECT,
            where_clause,
            build_post_order_clause(query.order)
        );

        let mut sql_query = sqlx::query(&sql);
        if let Some(tagname) = &query.tagname {
            sql_query = sql_query.bind(tagname);
        }

        let rows = sql_query
            .fetch_all(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.iter().map(post_from_row).collect())
    }
}
