use tabled::Tabled;

use crate::api::AppState;
use crate::api::users::{self, AuthRequest};
use crate::auth::{JwtIssuer, TokenIssuer};
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{Rendered, render_json, render_list};
use crate::db::{Database, Id, UserSummary};

#[derive(Tabled)]
struct UserDisplay {
    #[tabled(rename = "ID")]
    id: Id,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Posts")]
    posts: i64,
    #[tabled(rename = "Tags")]
    tags: i64,
    #[tabled(rename = "Views")]
    views: i64,
    #[tabled(rename = "Joined")]
    created_at: String,
}

impl From<&UserSummary> for UserDisplay {
    fn from(user: &UserSummary) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            posts: user.posts_count,
            tags: user.tags_count,
            views: user.views,
            created_at: user.created_at.clone(),
        }
    }
}

fn credentials(username: &str, password: &str) -> AuthRequest {
    AuthRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

pub async fn register_user<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    username: &str,
    password: &str,
) -> CliResult<Rendered> {
    render_json(users::register(state, &credentials(username, password)).await)
}

pub async fn login_user<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    username: &str,
    password: &str,
) -> CliResult<Rendered> {
    render_json(users::login(state, &credentials(username, password)).await)
}

/// List users ordered by post count
pub async fn list_users<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    format: &str,
) -> CliResult<Rendered> {
    render_list(users::retrieve_all(state).await, format, |user| {
        UserDisplay::from(user)
    })
}

pub async fn show_user<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    id: Id,
) -> CliResult<Rendered> {
    render_json(users::retrieve_one(state, id).await)
}

/// Resolve a session token to the profile of the user it was issued for.
pub async fn whoami<D: Database>(
    state: &AppState<D, JwtIssuer>,
    token: &str,
) -> CliResult<Rendered> {
    let claims = state
        .tokens()
        .verify(token)
        .map_err(|source| CliError::InvalidToken { source })?;

    render_json(users::load_user(state, claims.user.id).await)
}
