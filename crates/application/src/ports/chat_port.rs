//! Chat port - Interface to the streaming assistant backend

use std::pin::Pin;

use async_trait::async_trait;
use domain::Conversation;
use futures::Stream;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// A finite, one-shot stream of reply text fragments
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, ApplicationError>> + Send>>;

/// Port for the conversational assistant
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Validate that a chat session can be served for the given persona
    async fn open_session(&self, system_prompt: &str) -> Result<(), ApplicationError>;

    /// Stream the assistant's reply to the latest turn of the conversation
    async fn stream_reply(
        &self,
        conversation: &Conversation,
    ) -> Result<ReplyStream, ApplicationError>;
}
