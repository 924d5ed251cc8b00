//! Domain entities - Objects with identity and lifecycle

mod chat_message;
mod conversation;
mod ride_offer;

pub use chat_message::{ChatMessage, MessageContent, MessageRole};
pub use conversation::Conversation;
pub use ride_offer::RideOffer;
