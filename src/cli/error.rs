use miette::Diagnostic;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to open database: {0}")]
    #[diagnostic(
        code(forum::cli::database),
        help("Check that --db (or FORUM_DB) points to a writable location.")
    )]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(forum::cli::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid token: {source}")]
    #[diagnostic(
        code(forum::cli::invalid_token),
        help("Tokens are signed with --jwt-secret / FORUM_JWT_SECRET; use the same secret that issued it.")
    )]
    InvalidToken {
        #[source]
        source: AuthError,
    },

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(forum::cli::output))]
    Output { message: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
