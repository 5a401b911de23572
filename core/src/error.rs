//! Error types for the book catalog client.
//!
//! # Design
//! The variants keep transport failures apart from protocol failures so logs
//! and the C ABI can tell them apart. The session collapses every variant into
//! a single `Response::Error`; nothing above the session sees the distinction.

use thiserror::Error;

/// Errors returned by `BooksClient`, transports and repositories.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was rejected before any I/O (blank query, bad limit, bad base URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport could not complete the round-trip (connect, DNS, TLS, read).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404: the requested volume does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-success status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// True for failures that happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
