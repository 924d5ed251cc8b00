//! Application services - The orchestrators

mod chat_session;
mod driver_service;
mod ride_service;
mod session;

pub use chat_session::{ASSISTANT_PERSONA, ChatSessionService};
pub use driver_service::{ActiveTrip, DriverConfig, DriverService, DriverView};
pub use ride_service::{MANUAL_PICKUP_PROMPT, PassengerView, RideConfig, RideService};
pub use session::SessionService;
