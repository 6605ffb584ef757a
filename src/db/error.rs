//! Database error types.
//!
//! Storage-agnostic errors for the forum repositories. Uses miette for
//! diagnostic codes and thiserror for the derive macros.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(forum::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Constraint violation: {message}")]
    #[diagnostic(code(forum::db::constraint))]
    Constraint { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(forum::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(forum::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(forum::db::connection_error))]
    Connection { message: String },
}

impl DbError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// The underlying driver text, without the variant prefix.
    pub fn driver_message(&self) -> String {
        match self {
            DbError::Constraint { message }
            | DbError::Database { message }
            | DbError::Migration { message }
            | DbError::Connection { message } => message.clone(),
            DbError::NotFound { .. } => self.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
