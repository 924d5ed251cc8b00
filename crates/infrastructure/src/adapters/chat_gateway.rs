//! Chat gateway adapter - Streaming assistant over the generative engine

use std::sync::Arc;

use ai_core::{GenerationRequest, GenerativeEngine};
use application::error::ApplicationError;
use application::ports::{ChatPort, ReplyStream};
use async_trait::async_trait;
use domain::Conversation;
use futures::StreamExt;
use tracing::{debug, instrument};

use super::map_generation_error;

/// `ChatPort` adapter backed by the generative engine
pub struct GenAiChatGateway {
    engine: Arc<dyn GenerativeEngine>,
}

impl std::fmt::Debug for GenAiChatGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiChatGateway").finish_non_exhaustive()
    }
}

impl GenAiChatGateway {
    /// Create a new gateway
    pub fn new(engine: Arc<dyn GenerativeEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl ChatPort for GenAiChatGateway {
    #[instrument(skip(self, _system_prompt))]
    async fn open_session(&self, _system_prompt: &str) -> Result<(), ApplicationError> {
        match self.engine.health_check().await {
            Ok(true) => {
                debug!("Chat backend reachable");
                Ok(())
            },
            Ok(false) => Err(ApplicationError::SessionInit(
                "generation service unreachable".to_string(),
            )),
            Err(e) => Err(ApplicationError::SessionInit(e.to_string())),
        }
    }

    #[instrument(skip(self, conversation), fields(turns = conversation.message_count()))]
    async fn stream_reply(
        &self,
        conversation: &Conversation,
    ) -> Result<ReplyStream, ApplicationError> {
        let request = GenerationRequest::from_conversation(conversation);

        let stream = self
            .engine
            .generate_stream(request)
            .await
            .map_err(map_generation_error)?;

        let fragments = stream.filter_map(|item| async move {
            match item {
                Ok(chunk) if chunk.content.is_empty() => None,
                Ok(chunk) => Some(Ok(chunk.content)),
                Err(e) => Some(Err(ApplicationError::Gateway(e.to_string()))),
            }
        });

        Ok(Box::pin(fragments))
    }
}
