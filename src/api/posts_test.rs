//! Tests for post operations.

use crate::api::posts::*;
use crate::api::{AppState, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND, into_envelope};
use crate::auth::JwtIssuer;
use crate::db::{Database, Id, NewPost, SqliteDatabase};

async fn setup_state() -> AppState<SqliteDatabase> {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    AppState::new(db, JwtIssuer::new("test-secret", 3600), 4)
}

async fn insert_user(state: &AppState<SqliteDatabase>, username: &str) -> Id {
    sqlx::query("INSERT INTO users (username, password, gravatar) VALUES (?, 'x', 'g')")
        .bind(username)
        .execute(state.db().pool())
        .await
        .expect("Insert user should succeed")
        .last_insert_rowid()
}

fn new_post(title: &str, user_id: Id, tagname: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        body: "How do I do this?".to_string(),
        user_id,
        tagname: tagname.to_string(),
    }
}

async fn stored_views(state: &AppState<SqliteDatabase>, id: Id) -> i64 {
    sqlx::query_scalar("SELECT views FROM posts WHERE id = ?")
        .bind(id)
        .fetch_one(state.db().pool())
        .await
        .expect("Post should exist")
}

#[tokio::test(flavor = "multi_thread")]
async fn create_returns_post_id() {
    let state = setup_state().await;
    let user_id = insert_user(&state, "alice").await;

    let envelope = create(&state, &new_post("Hello", user_id, "rust"), Some("Rust"))
        .await
        .expect("Create should succeed");

    assert!(envelope.success);
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.message, POST_CREATED);
    assert!(envelope.data.unwrap() > 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_for_missing_user_is_internal_error() {
    let state = setup_state().await;

    let err = create(&state, &new_post("Orphan", 99, "rust"), None)
        .await
        .expect_err("Create should fail");

    assert_eq!(err.status, STATUS_INTERNAL_ERROR);
    assert_eq!(err.message, "FOREIGN KEY constraint failed");
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_one_counts_each_view_once() {
    let state = setup_state().await;
    let user_id = insert_user(&state, "alice").await;
    let id = create(&state, &new_post("Viewed", user_id, "rust"), None)
        .await
        .unwrap()
        .data
        .unwrap();

    let first = retrieve_one(&state, id).await.expect("Read should succeed");
    assert_eq!(first.message, SUCCESS);
    assert_eq!(first.data.as_ref().unwrap().views, 1);
    assert_eq!(first.data.as_ref().unwrap().username, "alice");

    retrieve_one(&state, id).await.unwrap();
    retrieve_one(&state, id).await.unwrap();
    assert_eq!(stored_views(&state, id).await, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_one_survives_failed_view_increment() {
    let state = setup_state().await;
    let user_id = insert_user(&state, "alice").await;
    let id = create(&state, &new_post("Frozen", user_id, "rust"), None)
        .await
        .unwrap()
        .data
        .unwrap();

    sqlx::query(
        "CREATE TRIGGER freeze_post_views BEFORE UPDATE OF views ON posts \
         BEGIN SELECT RAISE(ABORT, 'views are frozen'); END",
    )
    .execute(state.db().pool())
    .await
    .expect("Trigger should be created");

    let envelope = retrieve_one(&state, id)
        .await
        .expect("Read should succeed despite failed increment");

    assert_eq!(envelope.data.unwrap().views, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_one_counts_view_even_when_post_lookup_misses() {
    let state = setup_state().await;
    let user_id = insert_user(&state, "alice").await;

    // A post without a tag link drops out of the overview join
    let id = sqlx::query("INSERT INTO posts (title, body, user_id) VALUES ('Untagged', 'b', ?)")
        .bind(user_id)
        .execute(state.db().pool())
        .await
        .expect("Insert post should succeed")
        .last_insert_rowid();

    let err = retrieve_one(&state, id).await.expect_err("Overview should miss");

    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, POST_NOT_FOUND);
    assert_eq!(stored_views(&state, id).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_one_missing_post_is_not_found() {
    let state = setup_state().await;

    let err = retrieve_one(&state, 404).await.expect_err("Should be missing");
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, POST_NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_then_retrieve_is_not_found() {
    let state = setup_state().await;
    let user_id = insert_user(&state, "alice").await;
    let id = create(&state, &new_post("Gone", user_id, "rust"), None)
        .await
        .unwrap()
        .data
        .unwrap();

    let removed = remove(&state, id).await.expect("Remove should succeed");
    assert_eq!(removed.message, POST_REMOVED);
    assert!(removed.data.is_none());

    let err = retrieve_one(&state, id).await.expect_err("Should be gone");
    assert_eq!(err.status, STATUS_NOT_FOUND);

    let again = remove(&state, id).await.expect_err("Second remove misses");
    assert_eq!(again.status, STATUS_NOT_FOUND);
    assert_eq!(again.message, POST_NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn listings_on_empty_table_are_not_found() {
    let state = setup_state().await;

    for result in [
        retrieve_all(&state).await,
        retrieve_all_top(&state).await,
        retrieve_all_tag(&state, "rust").await,
    ] {
        let envelope = into_envelope(result);
        assert!(!envelope.success);
        assert_eq!(envelope.status_code, STATUS_NOT_FOUND);
        assert_eq!(envelope.message, NO_POSTS);
        assert!(envelope.data.is_none());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn listings_follow_documented_order() {
    let state = setup_state().await;
    let user_id = insert_user(&state, "alice").await;

    let old = create(&state, &new_post("Old", user_id, "rust"), None)
        .await
        .unwrap()
        .data
        .unwrap();
    let new = create(&state, &new_post("New", user_id, "sql"), None)
        .await
        .unwrap()
        .data
        .unwrap();

    sqlx::query("INSERT INTO answers (body, user_id, post_id) VALUES ('a', ?, ?)")
        .bind(user_id)
        .bind(old)
        .execute(state.db().pool())
        .await
        .unwrap();

    let all = retrieve_all(&state).await.unwrap().data.unwrap();
    assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![new, old]);

    let top = retrieve_all_top(&state).await.unwrap().data.unwrap();
    assert_eq!(top.iter().map(|p| p.id).collect::<Vec<_>>(), vec![old, new]);
    assert_eq!(top[0].answer_count, 1);

    let tagged = retrieve_all_tag(&state, "sql").await.unwrap().data.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, new);
}
