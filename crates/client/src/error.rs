//! Client error types

use thiserror::Error;

/// Errors returned by dashboard API calls
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer; `message` comes from the server's error body when present
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
