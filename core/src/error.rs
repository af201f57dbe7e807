//! Error types for the pet-store client.
//!
//! # Design
//! Every failure a caller can observe is an `ApiError`. `NotFound` gets a
//! dedicated variant because callers frequently distinguish "the user does
//! not exist" from "the server returned an unexpected status." All other
//! unsuccessful responses land in `Http` with the raw status code and body.

use thiserror::Error;

/// Errors returned by request builders, transports, and response streams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status outside the success range other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The HTTP engine failed before a response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// The task executing the request panicked.
    #[error("request task failed: {0}")]
    TaskFailed(String),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
