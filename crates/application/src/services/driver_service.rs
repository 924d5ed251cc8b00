//! Driver service - Driver-side orchestrator
//!
//! Owns the driver lifecycle and the request polling timer. A fetch is
//! only issued when the driver is plainly online with no live offer and
//! no fetch already in flight, so at most one offer can ever be live.
//! Responses that arrive after the lifecycle was reset (epoch bump) are
//! discarded.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::{DomainError, DriverStatus, RideOffer};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{ConnectivityPort, OfferGatewayPort};

/// Configuration for the driver orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Seconds between incoming-request polls (default: 10)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

const fn default_poll_interval_secs() -> u64 {
    10
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Pickup/destination of the trip a driver accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTrip {
    /// Where to collect the passenger
    pub pickup: String,
    /// Where the passenger is going
    pub destination: String,
}

#[derive(Debug, Clone, Default)]
struct DriverState {
    status: DriverStatus,
    offer: Option<RideOffer>,
    trip: Option<ActiveTrip>,
    status_message: Option<String>,
    fetch_in_flight: bool,
    epoch: u64,
}

/// Snapshot of the driver state for presentation
#[derive(Debug, Clone)]
pub struct DriverView {
    /// Current driver status
    pub status: DriverStatus,
    /// The live incoming request, if any
    pub offer: Option<RideOffer>,
    /// The accepted trip, if one is underway
    pub trip: Option<ActiveTrip>,
    /// Latest user-facing status or error line
    pub status_message: Option<String>,
}

/// Driver-side orchestrator
pub struct DriverService {
    gateway: Arc<dyn OfferGatewayPort>,
    connectivity: Arc<dyn ConnectivityPort>,
    config: DriverConfig,
    state: RwLock<DriverState>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for DriverService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("DriverService")
            .field("status", &state.status)
            .field("has_offer", &state.offer.is_some())
            .finish_non_exhaustive()
    }
}

impl DriverService {
    /// Create a new driver orchestrator
    pub fn new(
        gateway: Arc<dyn OfferGatewayPort>,
        connectivity: Arc<dyn ConnectivityPort>,
        config: DriverConfig,
    ) -> Self {
        Self {
            gateway,
            connectivity,
            config,
            state: RwLock::new(DriverState::default()),
            poll_task: Mutex::new(None),
        }
    }

    /// Get a snapshot of the current driver state
    #[must_use]
    pub fn view(&self) -> DriverView {
        let state = self.state.read();
        DriverView {
            status: state.status,
            offer: state.offer.clone(),
            trip: state.trip.clone(),
            status_message: state.status_message.clone(),
        }
    }

    /// Get the current driver status
    #[must_use]
    pub fn status(&self) -> DriverStatus {
        self.state.read().status
    }

    /// Go online and start polling for incoming requests
    #[instrument(skip(self))]
    pub async fn go_online(self: &Arc<Self>) -> Result<(), ApplicationError> {
        if !self.connectivity.is_online().await {
            return Err(ApplicationError::Offline);
        }
        {
            let mut state = self.state.write();
            if state.status != DriverStatus::Offline {
                return Err(DomainError::invalid_transition(
                    state.status.label(),
                    "go online",
                )
                .into());
            }
            state.status = DriverStatus::Online;
            state.status_message = Some("You are online. Waiting for requests...".to_string());
        }
        info!("Driver went online");
        self.start_poll_timer();
        Ok(())
    }

    /// Go offline: clear any pending offer and halt the polling timer
    ///
    /// Idempotent, and valid from every state - this is also the session
    /// teardown path.
    #[instrument(skip(self))]
    pub fn go_offline(&self) {
        self.stop_poll_timer();
        let mut state = self.state.write();
        state.status = DriverStatus::Offline;
        state.offer = None;
        state.trip = None;
        state.fetch_in_flight = false;
        state.epoch += 1;
        state.status_message = Some("You are offline.".to_string());
        info!("Driver went offline");
    }

    /// Accept the pending incoming request
    ///
    /// Copies the offer's pickup/destination into the active-trip fields;
    /// the offer itself stays live until the trip completes.
    #[instrument(skip(self))]
    pub fn accept_request(&self) -> Result<(), ApplicationError> {
        let mut state = self.state.write();
        if state.status != DriverStatus::RequestPending {
            return Err(DomainError::invalid_transition(
                state.status.label(),
                "accept the request",
            )
            .into());
        }
        let (pickup, destination) = {
            let offer = state
                .offer
                .as_ref()
                .ok_or_else(|| ApplicationError::Internal("offer missing while pending".into()))?;
            (offer.pickup.clone(), offer.destination.clone())
        };
        state.status = DriverStatus::OnRide;
        state.status_message = Some(format!("Head to {pickup} to collect your passenger."));
        state.trip = Some(ActiveTrip {
            pickup,
            destination,
        });
        Ok(())
    }

    /// Decline the pending incoming request and go back to waiting
    #[instrument(skip(self))]
    pub fn decline_request(&self) -> Result<(), ApplicationError> {
        let mut state = self.state.write();
        if state.status != DriverStatus::RequestPending {
            return Err(DomainError::invalid_transition(
                state.status.label(),
                "decline the request",
            )
            .into());
        }
        state.status = DriverStatus::Online;
        state.offer = None;
        state.status_message = Some("Request declined. Waiting for the next one...".to_string());
        Ok(())
    }

    /// Complete the active trip
    #[instrument(skip(self))]
    pub fn complete_trip(&self) -> Result<(), ApplicationError> {
        let mut state = self.state.write();
        if state.status != DriverStatus::OnRide {
            return Err(DomainError::invalid_transition(
                state.status.label(),
                "complete the trip",
            )
            .into());
        }
        let fare = state.offer.take().map(|offer| offer.fare);
        state.status = DriverStatus::RideCompleted;
        state.trip = None;
        state.status_message = Some(match fare {
            Some(fare) => format!("Trip completed. {fare} collected."),
            None => "Trip completed.".to_string(),
        });
        Ok(())
    }

    /// Return to waiting for requests after a completed trip
    ///
    /// The polling timer kept running; only its guard held fetches back.
    #[instrument(skip(self))]
    pub fn go_online_again(&self) -> Result<(), ApplicationError> {
        let mut state = self.state.write();
        if state.status != DriverStatus::RideCompleted {
            return Err(DomainError::invalid_transition(
                state.status.label(),
                "go online again",
            )
            .into());
        }
        state.status = DriverStatus::Online;
        state.status_message = Some("You are online. Waiting for requests...".to_string());
        Ok(())
    }

    /// One polling tick: fetch a simulated incoming request when allowed
    ///
    /// The guard (online, no live offer, no fetch in flight) preserves the
    /// single-live-offer invariant; the epoch check discards responses
    /// that arrive after the lifecycle was reset.
    async fn poll_tick(&self) {
        let epoch = {
            let mut state = self.state.write();
            if !state.status.accepts_new_requests()
                || state.offer.is_some()
                || state.fetch_in_flight
            {
                return;
            }
            state.fetch_in_flight = true;
            state.epoch
        };

        if !self.connectivity.is_online().await {
            let mut state = self.state.write();
            state.fetch_in_flight = false;
            if state.epoch == epoch {
                state.status_message = Some(ApplicationError::Offline.to_string());
            }
            return;
        }

        debug!("Polling for an incoming ride request");
        let result = self.gateway.incoming_request().await;

        let mut state = self.state.write();
        state.fetch_in_flight = false;
        if state.epoch != epoch
            || !state.status.accepts_new_requests()
            || state.offer.is_some()
        {
            debug!("Discarding stale incoming-request response");
            return;
        }

        match result {
            Ok(offer) => {
                info!(passenger = %offer.counterpart, "Incoming ride request");
                state.status = DriverStatus::RequestPending;
                state.status_message = Some(format!(
                    "New request from {} ({})",
                    offer.counterpart, offer.fare
                ));
                state.offer = Some(offer);
            },
            Err(e) => {
                warn!(error = %e, "Incoming request fetch failed");
                state.status_message = Some(format!("Could not fetch requests: {e}"));
            },
        }
    }

    fn start_poll_timer(self: &Arc<Self>) {
        let mut guard = self.poll_task.lock();
        if guard.is_some() {
            return;
        }
        let service = Arc::clone(self);
        let period = Duration::from_secs(self.config.poll_interval_secs);
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // Skip the immediate first tick; polling starts one period
            // after going online.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                service.poll_tick().await;
            }
        }));
    }

    fn stop_poll_timer(&self) {
        if let Some(handle) = self.poll_task.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for DriverService {
    fn drop(&mut self) {
        self.stop_poll_timer();
    }
}
