//! Error types for chat dispatch and streaming.
//!
//! All construction-time and pre-flight failures are returned synchronously
//! through this type. Failures observed after a stream has started are logged
//! and absorbed so that every stream ends with a well-formed terminal event
//! instead of a dangling channel (see `crate::streaming`).

use thiserror::Error;

/// Errors surfaced by chat dispatch.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed conversation shape, rejected before any network call.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The backend returned zero choices.
    #[error("no response choices from backend")]
    EmptyResponse,

    /// The backend answered with a non-200 status. Status and body are
    /// carried verbatim; no retry is attempted.
    #[error("backend request failed with status {status}: {body}")]
    Backend { status: u16, body: String },

    /// The response envelope could not be decoded.
    #[error("failed to decode backend response: {0}")]
    Decode(String),

    /// Request construction or transport setup failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Client configuration is unusable (e.g. an API key that cannot be
    /// encoded into an Authorization header).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Convenience constructor for non-200 backend replies.
    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        Self::Backend {
            status,
            body: body.into(),
        }
    }
}
