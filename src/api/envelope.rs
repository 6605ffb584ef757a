//! Uniform response envelope.
//!
//! Every operation resolves to `ApiResult<T>`: either an `Envelope<T>`
//! carrying the payload, or an `ApiError` that renders as an envelope with
//! `success = false` and `data = null`.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// `{ success, statusCode, message, data }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// 200 with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: STATUS_OK,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 200 with `data = null`.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            status_code: STATUS_OK,
            message: message.into(),
            data: None,
        }
    }
}

/// Failed operation: an HTTP-style status and a caller-facing message.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{message} (status {status})")]
#[diagnostic(code(forum::api::error))]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(STATUS_BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(STATUS_NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(STATUS_INTERNAL_ERROR, message)
    }

    pub fn into_envelope<T>(self) -> Envelope<T> {
        Envelope {
            success: false,
            status_code: self.status,
            message: self.message,
            data: None,
        }
    }
}

/// Result of every API operation.
pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Collapse either outcome into the envelope shape callers receive.
pub fn into_envelope<T>(result: ApiResult<T>) -> Envelope<T> {
    result.unwrap_or_else(ApiError::into_envelope)
}
