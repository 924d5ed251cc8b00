//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// All of these recover locally: they are surfaced to the user as status
/// or error strings, never crash the session.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No network connection
    #[error("Network connection unavailable")]
    Offline,

    /// A required input is empty
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A request to an external collaborator failed
    #[error("Request failed: {0}")]
    Gateway(String),

    /// A structured response could not be parsed into a complete record
    #[error("Unparseable response: {0}")]
    UnparseableResponse(String),

    /// The collaborator returned nothing
    #[error("The service returned an empty response")]
    EmptyResponse,

    /// Chat session could not be started
    #[error("Chat session could not be started: {0}")]
    SessionInit(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is worth retrying
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Offline | Self::Gateway(_) | Self::EmptyResponse
        )
    }
}
