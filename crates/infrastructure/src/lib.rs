//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer on top of the
//! generative language engine, plus configuration loading, connectivity
//! probing, telemetry, and the composition root.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::{
    ConnectivityConfig, GenAiChatGateway, GenAiOfferGateway, HttpConnectivityProbe,
    StaticConnectivity,
};
pub use bootstrap::build_session;
pub use config::AppConfig;
pub use telemetry::init_telemetry;
