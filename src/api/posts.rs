//! Post operations.
//!
//! Each operation runs against the injected database and resolves to an
//! envelope. Storage failures surface as 500 with the driver's own message.

use tracing::{error, info, instrument};

use super::envelope::{ApiError, ApiResult, Envelope};
use super::state::AppState;
use super::views::record_view;
use crate::auth::TokenIssuer;
use crate::db::{Database, DbError, Id, NewPost, PostOverview, PostQuery, PostRepository};

pub const POST_CREATED: &str = "Post Created";
pub const POST_REMOVED: &str = "Post Removed";
pub const SUCCESS: &str = "Success";
pub const POST_NOT_FOUND: &str = "There isn't any post by this id";
pub const NO_POSTS: &str = "There are no posts";

fn storage_failure(e: DbError) -> ApiError {
    error!(error = %e, "post query failed");
    ApiError::internal(e.driver_message())
}

/// Create a post, its tag (if new), and the link between them.
///
/// Returns the new post id.
#[instrument(skip(state, post), fields(user_id = post.user_id, tagname = %post.tagname))]
pub async fn create<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    post: &NewPost,
    tag_description: Option<&str>,
) -> ApiResult<Id> {
    let id = state
        .db()
        .posts()
        .create(post, tag_description)
        .await
        .map_err(storage_failure)?;

    info!(post_id = id, "post created");
    Ok(Envelope::ok(POST_CREATED, id))
}

/// Delete a post with its tag links, answers, and comments.
#[instrument(skip(state))]
pub async fn remove<D: Database, T: TokenIssuer>(state: &AppState<D, T>, id: Id) -> ApiResult<()> {
    match state.db().posts().remove(id).await {
        Ok(()) => {
            info!(post_id = id, "post removed");
            Ok(Envelope::ok_empty(POST_REMOVED))
        }
        // Unknown ids are reported rather than acknowledged as removed
        Err(DbError::NotFound { .. }) => Err(ApiError::not_found(POST_NOT_FOUND)),
        Err(e) => Err(storage_failure(e)),
    }
}

/// Count a view, then load the post with its counts.
#[instrument(skip(state))]
pub async fn retrieve_one<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    id: Id,
) -> ApiResult<PostOverview> {
    let posts = state.db().posts();

    record_view("post", id, posts.increment_views(id)).await;

    match posts.get(id).await {
        Ok(post) => Ok(Envelope::ok(SUCCESS, post)),
        Err(DbError::NotFound { .. }) => Err(ApiError::not_found(POST_NOT_FOUND)),
        Err(e) => Err(storage_failure(e)),
    }
}

/// All posts, newest first.
#[instrument(skip(state))]
pub async fn retrieve_all<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
) -> ApiResult<Vec<PostOverview>> {
    list(state, &PostQuery::default()).await
}

/// All posts, most answers plus comments first.
#[instrument(skip(state))]
pub async fn retrieve_all_top<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
) -> ApiResult<Vec<PostOverview>> {
    list(state, &PostQuery::top()).await
}

/// Posts carrying one tag, newest first.
#[instrument(skip(state))]
pub async fn retrieve_all_tag<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    tagname: &str,
) -> ApiResult<Vec<PostOverview>> {
    list(state, &PostQuery::tagged(tagname)).await
}

async fn list<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    query: &PostQuery,
) -> ApiResult<Vec<PostOverview>> {
    let posts = state
        .db()
        .posts()
        .list(query)
        .await
        .map_err(storage_failure)?;

    if posts.is_empty() {
        return Err(ApiError::not_found(NO_POSTS));
    }

    Ok(Envelope::ok(SUCCESS, posts))
}
