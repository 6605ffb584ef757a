//! Shared helper functions for SQLite repositories.

use crate::db::{DbError, PostOrder};

/// Map a sqlx error onto the storage-agnostic error type.
///
/// Unique and foreign key violations become `Constraint`; everything else
/// is reported as a generic database failure with the driver message.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() || db_err.is_foreign_key_violation() => {
            DbError::Constraint {
                message: db_err.message().to_string(),
            }
        }
        Some(db_err) => DbError::Database {
            message: db_err.message().to_string(),
        },
        None => DbError::Database {
            message: e.to_string(),
        },
    }
}

/// Build the ORDER BY clause for post listings.
///
/// Ties fall back to the newest id so results are stable.
pub fn build_post_order_clause(order: PostOrder) -> &'static str {
    match order {
        PostOrder::Newest => "ORDER BY posts.created_at DESC, posts.id DESC",
        PostOrder::Engagement => {
            "ORDER BY (COUNT(DISTINCT answers.id) + COUNT(DISTINCT comments.id)) DESC, \
             COUNT(DISTINCT answers.id) DESC, posts.id DESC"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_newest() {
        assert_eq!(
            build_post_order_clause(PostOrder::Newest),
            "ORDER BY posts.created_at DESC, posts.id DESC"
        );
    }

    #[test]
    fn test_order_clause_engagement_sums_counts() {
        let clause = build_post_order_clause(PostOrder::Engagement);
        assert!(clause.starts_with(
            "ORDER BY (COUNT(DISTINCT answers.id) + COUNT(DISTINCT comments.id)) DESC"
        ));
        assert!(clause.ends_with("posts.id DESC"));
    }

    #[test]
    fn test_non_database_error_maps_to_database() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Database { .. }));
    }
}
