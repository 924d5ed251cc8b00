//! Adapters implementing the application ports

mod chat_gateway;
mod connectivity_probe;
mod offer_gateway;

use ai_core::GenerationError;
use application::ApplicationError;

pub use chat_gateway::GenAiChatGateway;
pub use connectivity_probe::{ConnectivityConfig, HttpConnectivityProbe, StaticConnectivity};
pub use offer_gateway::GenAiOfferGateway;

/// Map engine errors onto the application taxonomy
pub(crate) fn map_generation_error(error: GenerationError) -> ApplicationError {
    match error {
        GenerationError::InvalidResponse(message) => {
            ApplicationError::UnparseableResponse(message)
        },
        GenerationError::EmptyResponse => ApplicationError::EmptyResponse,
        other => ApplicationError::Gateway(other.to_string()),
    }
}
