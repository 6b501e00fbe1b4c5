use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to a text-generation provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timeout after {0:?}")]
    Timeout(Duration),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LlmError {
    /// Credential or permission problems; retrying with the same key will not help.
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::ApiError { status: 401 | 403, .. })
    }
}
