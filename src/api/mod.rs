//! Request/response operations for posts and users.
//!
//! Operations take the shared `AppState` and return `ApiResult<T>`, which
//! renders as the `{ success, statusCode, message, data }` envelope.

mod envelope;
pub mod posts;
mod state;
pub mod users;
mod views;

#[cfg(test)]
mod posts_test;
#[cfg(test)]
mod users_test;

pub use envelope::{
    ApiError, ApiResult, Envelope, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND,
    STATUS_OK, into_envelope,
};
pub use state::AppState;
pub use views::{ViewRecord, record_view};
