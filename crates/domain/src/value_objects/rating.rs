//! Star rating value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A star rating between 1.0 and 5.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating(f64);

impl Rating {
    /// Create a new rating with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` if the value is not a finite
    /// number in [1.0, 5.0].
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(1.0..=5.0).contains(&value) {
            return Err(DomainError::InvalidRating(value));
        }
        Ok(Self(value))
    }

    /// Get the numeric value
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
