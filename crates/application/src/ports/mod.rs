//! Port definitions for the application layer
//!
//! Ports are interfaces that define how the orchestrators interact with
//! external collaborators. Adapters in the infrastructure and integration
//! crates implement these ports.

mod chat_port;
mod connectivity_port;
mod location_port;
mod offer_gateway;

pub use chat_port::{ChatPort, ReplyStream};
#[cfg(test)]
pub use chat_port::MockChatPort;
pub use connectivity_port::ConnectivityPort;
#[cfg(test)]
pub use connectivity_port::MockConnectivityPort;
pub use location_port::{LocationFailure, LocationPort};
#[cfg(test)]
pub use location_port::MockLocationPort;
pub use offer_gateway::OfferGatewayPort;
#[cfg(test)]
pub use offer_gateway::MockOfferGatewayPort;
