//! Geolocation errors

use thiserror::Error;

/// Errors that can occur while resolving the device position
#[derive(Debug, Error)]
pub enum GeolocationError {
    /// The user denied the position request
    #[error("Position permission denied")]
    PermissionDenied,

    /// The position request timed out
    #[error("Position request timed out")]
    Timeout,

    /// No position source exists on this host
    #[error("Geolocation is not supported on this host")]
    Unsupported,

    /// Connection to the geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// The coordinates could not be resolved to a place name
    #[error("No place found for the given position")]
    NotFound,
}

impl From<reqwest::Error> for GeolocationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeolocationError::Timeout
        } else if err.is_connect() {
            GeolocationError::ConnectionFailed(err.to_string())
        } else {
            GeolocationError::RequestFailed(err.to_string())
        }
    }
}
