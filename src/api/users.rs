//! User operations: registration, login, listings and profile lookup.

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::envelope::{ApiError, ApiResult, Envelope};
use super::state::AppState;
use super::views::record_view;
use crate::auth::{TokenIssuer, hash_password, verify_password};
use crate::db::utils::{gravatar_url, random_avatar_seed};
use crate::db::{
    Database, DbError, Id, NewUser, UserProfile, UserRepository, UserStats, UserSummary,
};

pub const USER_REGISTERED: &str = "User registered";
pub const USER_LOGGED_IN: &str = "User logged in";
pub const SUCCESS: &str = "Success";
pub const REGISTER_FAILED: &str = "Some error occurred while registering the user.";
pub const LOGIN_FAILED: &str = "Some error occurred while logging in the user.";
pub const USER_DOES_NOT_EXIST: &str = "User does not exists";
pub const INCORRECT_PASSWORD: &str = "Incorrect password";
pub const NO_USERS: &str = "There are no users";
pub const LIST_FAILED: &str = "Something went wrong!";
pub const USER_MISSING: &str = "This user doesn't exists";
pub const LOOKUP_FAILED: &str = "Something went wrong";
pub const USER_NOT_FOUND: &str = "User not found";

/// Username and plain-text password, as submitted for register and login.
#[derive(Clone, Deserialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// Payload of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

fn issue_token<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    user_id: Id,
    message: &str,
) -> ApiResult<TokenResponse> {
    let token = state.tokens().issue(user_id).map_err(|e| {
        error!(user_id, error = %e, "failed to sign token");
        ApiError::internal(e.to_string())
    })?;

    Ok(Envelope::ok(message, TokenResponse { token }))
}

/// Hash the password, store the user with a default avatar, and sign a token.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    request: &AuthRequest,
) -> ApiResult<TokenResponse> {
    let password = hash_password(&request.password, state.bcrypt_cost())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            ApiError::internal(REGISTER_FAILED)
        })?;

    let user = NewUser {
        username: request.username.clone(),
        password,
        gravatar: gravatar_url(random_avatar_seed()),
    };

    let id = state.db().users().create(&user).await.map_err(|e| {
        error!(error = %e, "failed to register user");
        ApiError::internal(REGISTER_FAILED)
    })?;

    info!(user_id = id, "user registered");
    issue_token(state, id, USER_REGISTERED)
}

/// Check credentials and sign a token.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    request: &AuthRequest,
) -> ApiResult<TokenResponse> {
    let credentials = state
        .db()
        .users()
        .find_credentials(&request.username)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to look up user");
            ApiError::internal(LOGIN_FAILED)
        })?
        .ok_or_else(|| ApiError::not_found(USER_DOES_NOT_EXIST))?;

    let matches = verify_password(&request.password, &credentials.password)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to verify password");
            ApiError::internal(LOGIN_FAILED)
        })?;

    if !matches {
        warn!("incorrect password");
        return Err(ApiError::bad_request(INCORRECT_PASSWORD));
    }

    issue_token(state, credentials.id, USER_LOGGED_IN)
}

/// Every user with post and tag counts, most posts first.
#[instrument(skip(state))]
pub async fn retrieve_all<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
) -> ApiResult<Vec<UserSummary>> {
    let users = state.db().users().list().await.map_err(|e| {
        error!(error = %e, "failed to list users");
        ApiError::internal(LIST_FAILED)
    })?;

    if users.is_empty() {
        return Err(ApiError::not_found(NO_USERS));
    }

    Ok(Envelope::ok(SUCCESS, users))
}

/// Count a view, then load the user with every derived count.
#[instrument(skip(state))]
pub async fn retrieve_one<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    id: Id,
) -> ApiResult<UserStats> {
    let users = state.db().users();

    record_view("user", id, users.increment_views(id)).await;

    match users.get_stats(id).await {
        Ok(stats) => Ok(Envelope::ok(SUCCESS, stats)),
        Err(DbError::NotFound { .. }) => Err(ApiError::not_found(USER_MISSING)),
        Err(e) => {
            error!(error = %e, "failed to load user");
            Err(ApiError::internal(LOOKUP_FAILED))
        }
    }
}

/// Minimal profile for identity checks.
#[instrument(skip(state))]
pub async fn load_user<D: Database, T: TokenIssuer>(
    state: &AppState<D, T>,
    id: Id,
) -> ApiResult<UserProfile> {
    match state.db().users().get_profile(id).await {
        Ok(profile) => Ok(Envelope::ok(SUCCESS, profile)),
        Err(DbError::NotFound { .. }) => Err(ApiError::not_found(USER_NOT_FOUND)),
        Err(e) => {
            error!(error = %e, "failed to load profile");
            Err(ApiError::internal(USER_NOT_FOUND))
        }
    }
}
