//! Application configuration
//!
//! Loaded from an optional TOML file plus `FARELANE_*` environment
//! overrides (e.g. `FARELANE_GENERATION__API_KEY`).

use std::path::Path;

use ai_core::GenAiConfig;
use application::error::ApplicationError;
use application::services::{DriverConfig, RideConfig};
use integration_geolocation::GeolocationConfig;
use serde::{Deserialize, Serialize};

use crate::adapters::ConnectivityConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative language API settings
    #[serde(default)]
    pub generation: GenAiConfig,

    /// Passenger orchestrator settings
    #[serde(default)]
    pub ride: RideConfig,

    /// Driver orchestrator settings
    #[serde(default)]
    pub driver: DriverConfig,

    /// Connectivity probe settings
    #[serde(default)]
    pub connectivity: ConnectivityConfig,

    /// Geolocation settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

impl AppConfig {
    /// Load configuration from a file (optional) and the environment
    ///
    /// Without an explicit path, `farelane.toml` in the working directory
    /// is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name("farelane").required(false)),
        };

        builder
            .add_source(config::Environment::with_prefix("FARELANE").separator("__"))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ApplicationError::Configuration(e.to_string()))
    }
}
