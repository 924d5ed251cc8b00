//! Connectivity port - Network reachability probe
//!
//! Every external-request entry point guards on this before dispatching;
//! when offline the action is rejected up front instead of attempted.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Port for checking network reachability
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConnectivityPort: Send + Sync {
    /// Check whether the network is currently reachable
    async fn is_online(&self) -> bool;
}
