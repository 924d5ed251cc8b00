//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Rating outside the 1.0-5.0 range
    #[error("Invalid rating: {0} (must be between 1.0 and 5.0)")]
    InvalidRating(f64),

    /// Fare amount is negative or not a finite number
    #[error("Invalid fare amount: {0}")]
    InvalidFare(f64),

    /// Latitude/longitude outside valid ranges
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// A lifecycle action was requested from a state that does not allow it
    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: String, action: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid transition error
    pub fn invalid_transition(from: impl Into<String>, action: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            action: action.into(),
        }
    }
}
