//! Backend client error types.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Short label for the status line.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(e) if e.is_timeout() => "timeout",
            ApiError::Network(_) => "network",
            ApiError::Status { .. } => "server",
            ApiError::InvalidResponse(_) => "response",
            ApiError::InvalidUrl(_) => "config",
        }
    }
}
