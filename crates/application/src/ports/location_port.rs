//! Location port - Interface for resolving the device position
//!
//! Yields a display string for the current place. Every failure mode is
//! recoverable: the orchestrator falls back to manual entry.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Why the current place could not be resolved
#[derive(Debug, Error)]
pub enum LocationFailure {
    /// The user denied the position request
    #[error("Location permission denied")]
    PermissionDenied,

    /// The position request timed out
    #[error("Location request timed out")]
    Timeout,

    /// No position source exists on this host
    #[error("Location is not supported on this device")]
    Unsupported,

    /// The position was found but could not be turned into a place name
    #[error("Location lookup failed: {0}")]
    Lookup(String),
}

/// Port for resolving the current position to a display string
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Resolve the device position to a human-readable place name
    async fn current_place(&self) -> Result<String, LocationFailure>;
}
