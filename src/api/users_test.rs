//! Tests for user operations.

use crate::api::users::*;
use crate::api::{AppState, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND};
use crate::auth::{AuthError, JwtIssuer, MockTokenIssuer, TokenIssuer};
use crate::db::{Database, Id, NewPost, PostRepository, SqliteDatabase};

// Lowest bcrypt cost; keeps registration fast in tests.
const TEST_COST: u32 = 4;

async fn test_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

async fn setup_state() -> AppState<SqliteDatabase> {
    AppState::new(test_db().await, JwtIssuer::new("test-secret", 3600), TEST_COST)
}

fn request(username: &str, password: &str) -> AuthRequest {
    AuthRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

async fn insert_post<T: TokenIssuer>(
    state: &AppState<SqliteDatabase, T>,
    user_id: Id,
    tagname: &str,
) {
    state
        .db()
        .posts()
        .create(
            &NewPost {
                title: "title".to_string(),
                body: "body".to_string(),
                user_id,
                tagname: tagname.to_string(),
            },
            None,
        )
        .await
        .expect("Create post should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn register_returns_verifiable_token() {
    let state = setup_state().await;

    let envelope = register(&state, &request("alice", "hunter2"))
        .await
        .expect("Register should succeed");

    assert!(envelope.success);
    assert_eq!(envelope.message, USER_REGISTERED);
    let token = envelope.data.unwrap().token;
    assert!(!token.is_empty());

    let claims = JwtIssuer::new("test-secret", 3600)
        .verify(&token)
        .expect("Token should verify");
    let profile = load_user(&state, claims.user.id).await.unwrap();
    assert_eq!(profile.data.unwrap().username, "alice");
}

#[tokio::test(flavor = "multi_thread")]
async fn register_stores_hash_and_avatar() {
    let state = setup_state().await;
    register(&state, &request("alice", "hunter2")).await.unwrap();

    let (password, gravatar): (String, String) =
        sqlx::query_as("SELECT password, gravatar FROM users WHERE username = 'alice'")
            .fetch_one(state.db().pool())
            .await
            .unwrap();

    assert_ne!(password, "hunter2");
    assert!(password.starts_with("$2"));
    assert!(gravatar.starts_with("https://secure.gravatar.com/avatar/"));
}

#[tokio::test(flavor = "multi_thread")]
async fn register_duplicate_username_is_internal_error() {
    let state = setup_state().await;
    register(&state, &request("alice", "one")).await.unwrap();

    let err = register(&state, &request("alice", "two"))
        .await
        .expect_err("Duplicate should fail");

    assert_eq!(err.status, STATUS_INTERNAL_ERROR);
    assert_eq!(err.message, REGISTER_FAILED);
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_correct_password() {
    let state = setup_state().await;
    register(&state, &request("alice", "hunter2")).await.unwrap();

    let envelope = login(&state, &request("alice", "hunter2"))
        .await
        .expect("Login should succeed");

    assert_eq!(envelope.message, USER_LOGGED_IN);
    assert!(!envelope.data.unwrap().token.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_wrong_password_is_bad_request() {
    let state = setup_state().await;
    register(&state, &request("alice", "hunter2")).await.unwrap();

    let err = login(&state, &request("alice", "wrong"))
        .await
        .expect_err("Login should fail");

    assert_eq!(err.status, STATUS_BAD_REQUEST);
    assert_eq!(err.message, INCORRECT_PASSWORD);
}

#[tokio::test(flavor = "multi_thread")]
async fn login_unknown_user_is_not_found() {
    let state = setup_state().await;

    let err = login(&state, &request("ghost", "boo"))
        .await
        .expect_err("Login should fail");

    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, USER_DOES_NOT_EXIST);
}

#[tokio::test(flavor = "multi_thread")]
async fn token_failure_surfaces_as_internal_error() {
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_issue().times(1).returning(|_| {
        Err(AuthError::Token(
            jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into(),
        ))
    });
    let state = AppState::new(test_db().await, tokens, TEST_COST);

    let err = register(&state, &request("alice", "hunter2"))
        .await
        .expect_err("Signing should fail");

    assert_eq!(err.status, STATUS_INTERNAL_ERROR);
}

#[tokio::test(flavor = "multi_thread")]
async fn issued_token_carries_registered_user_id() {
    let mut tokens = MockTokenIssuer::new();
    tokens
        .expect_issue()
        .withf(|user_id| *user_id == 1)
        .times(1)
        .returning(|_| Ok("signed".to_string()));
    let state = AppState::new(test_db().await, tokens, TEST_COST);

    let envelope = register(&state, &request("first", "pw")).await.unwrap();
    assert_eq!(envelope.data.unwrap().token, "signed");
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_all_empty_is_not_found() {
    let state = setup_state().await;

    let err = retrieve_all(&state).await.expect_err("No users yet");
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, NO_USERS);
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_all_sorted_by_post_count() {
    let state = setup_state().await;
    register(&state, &request("quiet", "pw")).await.unwrap();
    register(&state, &request("busy", "pw")).await.unwrap();

    let busy_id: Id = sqlx::query_scalar("SELECT id FROM users WHERE username = 'busy'")
        .fetch_one(state.db().pool())
        .await
        .unwrap();
    insert_post(&state, busy_id, "rust").await;
    insert_post(&state, busy_id, "sql").await;

    let users = retrieve_all(&state).await.unwrap().data.unwrap();
    assert_eq!(users[0].username, "busy");
    assert_eq!(users[0].posts_count, 2);
    assert_eq!(users[0].tags_count, 2);
    assert_eq!(users[1].username, "quiet");
    assert_eq!(users[1].posts_count, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_one_counts_views_and_returns_stats() {
    let state = setup_state().await;
    register(&state, &request("alice", "pw")).await.unwrap();
    let id: Id = sqlx::query_scalar("SELECT id FROM users WHERE username = 'alice'")
        .fetch_one(state.db().pool())
        .await
        .unwrap();
    insert_post(&state, id, "rust").await;

    let first = retrieve_one(&state, id).await.unwrap().data.unwrap();
    assert_eq!(first.views, 1);
    assert_eq!(first.posts_count, 1);
    assert_eq!(first.tags_count, 1);
    assert_eq!(first.answers_count, 0);

    let second = retrieve_one(&state, id).await.unwrap().data.unwrap();
    assert_eq!(second.views, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn retrieve_one_missing_user_is_not_found() {
    let state = setup_state().await;

    let err = retrieve_one(&state, 5).await.expect_err("No such user");
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, USER_MISSING);
}

#[tokio::test(flavor = "multi_thread")]
async fn load_user_missing_is_not_found() {
    let state = setup_state().await;

    let err = load_user(&state, 5).await.expect_err("No such user");
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, USER_NOT_FOUND);
}
