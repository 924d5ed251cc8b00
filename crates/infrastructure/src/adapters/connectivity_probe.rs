//! Connectivity probe - HTTP reachability check
//!
//! The browser original read `navigator.onLine`; here reachability is a
//! cheap HEAD request against a generate-204 style endpoint.

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::ConnectivityPort;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the connectivity probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// URL to probe
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_probe_url() -> String {
    "https://clients3.google.com/generate_204".to_string()
}

const fn default_probe_timeout_ms() -> u64 {
    3000
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_url: default_probe_url(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

/// `ConnectivityPort` adapter probing an HTTP endpoint
#[derive(Debug)]
pub struct HttpConnectivityProbe {
    client: Client,
    probe_url: String,
}

impl HttpConnectivityProbe {
    /// Create a new probe
    pub fn new(config: ConnectivityConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            probe_url: config.probe_url,
        })
    }
}

#[async_trait]
impl ConnectivityPort for HttpConnectivityProbe {
    async fn is_online(&self) -> bool {
        match self.client.head(&self.probe_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Connectivity probe failed");
                false
            },
        }
    }
}

/// Fixed connectivity state, for hosts and tests without a network
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(bool);

impl StaticConnectivity {
    /// Always report online
    #[must_use]
    pub const fn online() -> Self {
        Self(true)
    }

    /// Always report offline
    #[must_use]
    pub const fn offline() -> Self {
        Self(false)
    }
}

#[async_trait]
impl ConnectivityPort for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}
