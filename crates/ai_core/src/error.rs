//! Generation errors

use thiserror::Error;

/// Errors that can occur while talking to the generative language API
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Failed to connect to the API
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the API failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// No API key configured
    #[error("API key is not configured")]
    ApiKeyMissing,

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model returned no content
    #[error("Empty response from model")]
    EmptyResponse,

    /// Timeout during generation
    #[error("Generation timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Streaming error
    #[error("Stream error: {0}")]
    StreamError(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout(30000)
        } else if err.is_connect() {
            GenerationError::ConnectionFailed(err.to_string())
        } else {
            GenerationError::RequestFailed(err.to_string())
        }
    }
}
