//! Session service - Mode selection and session reset
//!
//! The root orchestrator of a demo session: owns the mode choice and the
//! passenger/driver/chat services, and tears the ride lifecycles down on
//! reset. The chat session handle survives a reset - it lives for the
//! whole page session.

use std::fmt;
use std::sync::Arc;

use domain::{DomainError, Mode};
use parking_lot::RwLock;
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::services::{ChatSessionService, DriverService, RideService};

/// Root orchestrator of a demo session
pub struct SessionService {
    mode: RwLock<Mode>,
    passenger: Arc<RideService>,
    driver: Arc<DriverService>,
    chat: Arc<ChatSessionService>,
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("mode", &*self.mode.read())
            .finish_non_exhaustive()
    }
}

impl SessionService {
    /// Create a new session
    pub fn new(
        passenger: Arc<RideService>,
        driver: Arc<DriverService>,
        chat: Arc<ChatSessionService>,
    ) -> Self {
        Self {
            mode: RwLock::new(Mode::Unselected),
            passenger,
            driver,
            chat,
        }
    }

    /// Get the current mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        *self.mode.read()
    }

    /// Choose the passenger or driver experience
    ///
    /// The mode is set once per session; going back requires a reset.
    #[instrument(skip(self))]
    pub fn select_mode(&self, mode: Mode) -> Result<(), ApplicationError> {
        if !mode.is_selected() {
            return Err(ApplicationError::MissingInput("mode".into()));
        }
        let mut current = self.mode.write();
        if current.is_selected() {
            return Err(
                DomainError::invalid_transition(current.label(), "select a mode").into(),
            );
        }
        *current = mode;
        info!(mode = %mode, "Mode selected");
        Ok(())
    }

    /// Reset the session back to the mode chooser
    ///
    /// Clears the passenger lifecycle and takes the driver offline (which
    /// also tears down its polling timer). The chat session is kept.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.passenger.reset();
        self.driver.go_offline();
        *self.mode.write() = Mode::Unselected;
        info!("Session reset");
    }

    /// The passenger orchestrator
    #[must_use]
    pub fn passenger(&self) -> &Arc<RideService> {
        &self.passenger
    }

    /// The driver orchestrator
    #[must_use]
    pub fn driver(&self) -> &Arc<DriverService> {
        &self.driver
    }

    /// The chat session manager
    #[must_use]
    pub fn chat(&self) -> &Arc<ChatSessionService> {
        &self.chat
    }
}
