use tabled::Tabled;

use crate::api::{AppState, posts};
use crate::auth::TokenIssuer;
use crate::cli::error::CliResult;
use crate::cli::utils::{Rendered, render_json, render_list, truncate_with_ellipsis};
use crate::db::{Database, Id, NewPost, PostOverview};

#[derive(Tabled)]
struct PostDisplay {
    #[tabled(rename = "ID")]
    id: Id,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Views")]
    views: i64,
    #[tabled(rename = "Answers")]
    answers: i64,
    #[tabled(rename = "Comments")]
    comments: i64,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&PostOverview> for PostDisplay {
    fn from(post: &PostOverview) -> Self {
        Self {
            id: post.id,
            title: truncate_with_ellipsis(&post.title, 40),
            tag: post.tagname.clone(),
            author: post.username.clone(),
            views: post.views,
            answers: post.answer_count,
            comments: post.comment_count,
            created_at: post.created_at.clone(),
        }
    }
}

/// Create a post under a tag
pub async fn create_post<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    post: &NewPost,
    tag_description: Option<&str>,
) -> CliResult<Rendered> {
    render_json(posts::create(state, post, tag_description).await)
}

pub async fn remove_post<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    id: Id,
) -> CliResult<Rendered> {
    render_json(posts::remove(state, id).await)
}

/// Show a single post, counting the view
pub async fn show_post<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    id: Id,
) -> CliResult<Rendered> {
    render_json(posts::retrieve_one(state, id).await)
}

/// List posts: newest first, by engagement with `top`, or filtered by tag
pub async fn list_posts<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    top: bool,
    tag: Option<&str>,
    format: &str,
) -> CliResult<Rendered> {
    let result = match (top, tag) {
        (true, _) => posts::retrieve_all_top(state).await,
        (false, Some(tagname)) => posts::retrieve_all_tag(state, tagname).await,
        (false, None) => posts::retrieve_all(state).await,
    };

    render_list(result, format, |post| PostDisplay::from(post))
}
