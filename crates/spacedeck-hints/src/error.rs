//! Hint provider error types.

use thiserror::Error;

/// Errors that can occur when asking a text-generation service for a hint.
#[derive(Debug, Error)]
pub enum HintError {
    /// The API key was missing, invalid or lacked permission.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The requested model does not exist.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service answered but produced no text.
    #[error("no hint text in response")]
    EmptyResponse,
}

impl HintError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            HintError::AuthenticationFailed(_) | HintError::ModelNotFound(_)
        )
    }
}
