//! Session mode value object
//!
//! Whether the user is role-playing the passenger or the driver side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The experience currently selected for the session
///
/// Chosen once at the start of a session; a session reset returns it
/// to `Unselected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// No experience chosen yet
    #[default]
    Unselected,
    /// Riding as a passenger
    Passenger,
    /// Driving for the platform
    Driver,
}

impl Mode {
    /// Check whether an experience has been chosen
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        !matches!(self, Self::Unselected)
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unselected => "Not selected",
            Self::Passenger => "Passenger",
            Self::Driver => "Driver",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unselected() {
        assert_eq!(Mode::default(), Mode::Unselected);
    }

    #[test]
    fn is_selected_works() {
        assert!(!Mode::Unselected.is_selected());
        assert!(Mode::Passenger.is_selected());
        assert!(Mode::Driver.is_selected());
    }

    #[test]
    fn serialization() {
        let json = serde_json::to_string(&Mode::Passenger).unwrap();
        assert_eq!(json, r#""passenger""#);

        let parsed: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Mode::Passenger);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(Mode::Driver.to_string(), "Driver");
    }
}
