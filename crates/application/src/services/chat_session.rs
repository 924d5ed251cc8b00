//! Chat session service - Conversational assistant core
//!
//! Owns the single chat session: the lazily-opened handle, the ordered
//! turn sequence, and the streamed-fragment merge that makes the
//! assistant "type" its reply into a pending placeholder turn. Sends are
//! serialized through an async mutex, so turn ordering is total.

use std::fmt;
use std::sync::Arc;

use domain::{ChatMessage, Conversation};
use futures::StreamExt;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{ChatPort, ConnectivityPort};

/// Persona the assistant is bound to for the lifetime of the session
pub const ASSISTANT_PERSONA: &str = "You are Skye, the in-app assistant of the Farelane \
    ride-sharing demo. Help riders and drivers with rides, fares, pickup and destination \
    questions. Keep answers short, friendly, and concrete. Never claim that real rides, \
    payments, or drivers exist - this is a demo.";

const GREETING: &str = "Hi! I'm Skye. Ask me anything about your ride.";
const REPLY_FAILED_MESSAGE: &str = "Sorry - I could not finish that reply. Please try again.";
const EMPTY_REPLY_MESSAGE: &str = "Sorry - I did not get a reply. Please try again.";

struct ChatState {
    conversation: Conversation,
    opened: bool,
}

/// The chat session manager
pub struct ChatSessionService {
    chat: Arc<dyn ChatPort>,
    connectivity: Arc<dyn ConnectivityPort>,
    persona: String,
    state: tokio::sync::Mutex<ChatState>,
}

impl fmt::Debug for ChatSessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSessionService")
            .field("persona_len", &self.persona.len())
            .finish_non_exhaustive()
    }
}

impl ChatSessionService {
    /// Create a new chat session manager with the default persona
    pub fn new(chat: Arc<dyn ChatPort>, connectivity: Arc<dyn ConnectivityPort>) -> Self {
        Self::with_persona(chat, connectivity, ASSISTANT_PERSONA)
    }

    /// Create a chat session manager with a custom persona
    pub fn with_persona(
        chat: Arc<dyn ChatPort>,
        connectivity: Arc<dyn ConnectivityPort>,
        persona: impl Into<String>,
    ) -> Self {
        let persona = persona.into();
        Self {
            chat,
            connectivity,
            state: tokio::sync::Mutex::new(ChatState {
                conversation: Conversation::with_system_prompt(persona.clone()),
                opened: false,
            }),
            persona,
        }
    }

    /// Open the session if it is not open yet; reuse it otherwise
    ///
    /// Seeds the greeting turn on first open. Idempotent while the
    /// session handle is valid - it is never recreated.
    #[instrument(skip(self))]
    pub async fn open_or_reuse(&self) -> Result<(), ApplicationError> {
        let mut state = self.state.lock().await;
        if state.opened {
            return Ok(());
        }
        self.chat
            .open_session(&self.persona)
            .await
            .map_err(|e| ApplicationError::SessionInit(e.to_string()))?;
        state.opened = true;
        if state.conversation.is_empty() {
            state.conversation.add_assistant_message(GREETING);
        }
        debug!("Chat session opened");
        Ok(())
    }

    /// Send a user turn and stream the assistant's reply into place
    ///
    /// Rejected up front when offline or when the text is blank - in both
    /// cases nothing is appended and the session handle is untouched.
    /// Everything after dispatch recovers locally: failures resolve the
    /// placeholder turn rather than erroring the call.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn send_turn(&self, text: &str) -> Result<(), ApplicationError> {
        if !self.connectivity.is_online().await {
            return Err(ApplicationError::Offline);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ApplicationError::MissingInput("message".into()));
        }

        let mut state = self.state.lock().await;
        state.conversation.add_user_message(trimmed);

        if !state.opened {
            match self.chat.open_session(&self.persona).await {
                Ok(()) => state.opened = true,
                Err(e) => {
                    warn!(error = %e, "Chat session could not be started");
                    state
                        .conversation
                        .add_assistant_message(format!("I could not start our chat: {e}"));
                    return Ok(());
                },
            }
        }

        let context = state.conversation.clone();
        let reply_id = state.conversation.begin_assistant_reply();

        let mut stream = match self.chat.stream_reply(&context).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Reply stream could not be opened");
                state.conversation.fill_streaming(reply_id, REPLY_FAILED_MESSAGE);
                return Ok(());
            },
        };

        let mut accumulated = String::new();
        let mut failed = false;
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    accumulated.push_str(&fragment);
                    state
                        .conversation
                        .fill_streaming(reply_id, accumulated.clone());
                },
                Err(e) => {
                    warn!(error = %e, "Reply stream failed mid-flight");
                    if state.conversation.has_unresolved(reply_id) {
                        state
                            .conversation
                            .fill_streaming(reply_id, REPLY_FAILED_MESSAGE);
                    } else {
                        state.conversation.add_assistant_message(REPLY_FAILED_MESSAGE);
                    }
                    failed = true;
                    break;
                },
            }
        }

        // A stream that ended without content must not leave the
        // placeholder dangling.
        if !failed && state.conversation.has_unresolved(reply_id) {
            state
                .conversation
                .fill_streaming(reply_id, EMPTY_REPLY_MESSAGE);
        }

        Ok(())
    }

    /// Whether the session handle is open
    pub async fn is_open(&self) -> bool {
        self.state.lock().await.opened
    }

    /// Snapshot of the turn sequence, oldest first
    pub async fn turns(&self) -> Vec<ChatMessage> {
        self.state.lock().await.conversation.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use domain::MessageRole;
    use futures::stream;

    use super::*;
    use crate::ports::{MockChatPort, MockConnectivityPort, ReplyStream};

    fn online() -> Arc<MockConnectivityPort> {
        let mut connectivity = MockConnectivityPort::new();
        connectivity.expect_is_online().returning(|| true);
        Arc::new(connectivity)
    }

    fn offline() -> Arc<MockConnectivityPort> {
        let mut connectivity = MockConnectivityPort::new();
        connectivity.expect_is_online().returning(|| false);
        Arc::new(connectivity)
    }

    fn fragment_stream(fragments: Vec<Result<&'static str, ApplicationError>>) -> ReplyStream {
        Box::pin(stream::iter(
            fragments
                .into_iter()
                .map(|item| item.map(str::to_string))
                .collect::<Vec<_>>(),
        ))
    }

    #[tokio::test]
    async fn open_or_reuse_seeds_a_single_greeting() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().times(1).returning(|_| Ok(()));

        let service = ChatSessionService::new(Arc::new(chat), online());

        service.open_or_reuse().await.unwrap();
        service.open_or_reuse().await.unwrap();

        let turns = service.turns().await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, MessageRole::Assistant);
        assert_eq!(turns[0].text(), Some(GREETING));
        assert!(service.is_open().await);
    }

    #[tokio::test]
    async fn open_failure_surfaces_session_init() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session()
            .returning(|_| Err(ApplicationError::Gateway("no key".into())));

        let service = ChatSessionService::new(Arc::new(chat), online());
        let result = service.open_or_reuse().await;

        assert!(matches!(result, Err(ApplicationError::SessionInit(_))));
        assert!(!service.is_open().await);
        assert!(service.turns().await.is_empty());
    }

    #[tokio::test]
    async fn send_turn_rejected_while_offline() {
        let chat = MockChatPort::new();
        let service = ChatSessionService::new(Arc::new(chat), offline());

        let result = service.send_turn("hello").await;

        assert!(matches!(result, Err(ApplicationError::Offline)));
        assert!(service.turns().await.is_empty());
        assert!(!service.is_open().await);
    }

    #[tokio::test]
    async fn send_turn_rejects_blank_text() {
        let chat = MockChatPort::new();
        let service = ChatSessionService::new(Arc::new(chat), online());

        let result = service.send_turn("   \n\t ").await;

        assert!(matches!(result, Err(ApplicationError::MissingInput(_))));
        assert!(service.turns().await.is_empty());
    }

    #[tokio::test]
    async fn streamed_fragments_merge_into_one_assistant_turn() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().returning(|_| Ok(()));
        chat.expect_stream_reply()
            .returning(|_| Ok(fragment_stream(vec![Ok("Hel"), Ok("lo"), Ok("!")])));

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("hi").await.unwrap();

        let turns = service.turns().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, MessageRole::User);
        assert_eq!(turns[0].text(), Some("hi"));
        assert_eq!(turns[1].role, MessageRole::Assistant);
        assert_eq!(turns[1].text(), Some("Hello!"));
        assert!(!turns[1].is_pending());
    }

    #[tokio::test]
    async fn stream_open_failure_resolves_the_placeholder() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().returning(|_| Ok(()));
        chat.expect_stream_reply()
            .returning(|_| Err(ApplicationError::Gateway("boom".into())));

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("hi").await.unwrap();

        let turns = service.turns().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].text(), Some(REPLY_FAILED_MESSAGE));
        assert!(!turns[1].is_pending());
    }

    #[tokio::test]
    async fn mid_stream_failure_keeps_partial_text_and_appends_failure_turn() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().returning(|_| Ok(()));
        chat.expect_stream_reply().returning(|_| {
            Ok(fragment_stream(vec![
                Ok("Partial"),
                Err(ApplicationError::Gateway("cut off".into())),
            ]))
        });

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("hi").await.unwrap();

        let turns = service.turns().await;
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].text(), Some("Partial"));
        assert_eq!(turns[2].text(), Some(REPLY_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn failure_before_any_fragment_replaces_the_placeholder() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().returning(|_| Ok(()));
        chat.expect_stream_reply().returning(|_| {
            Ok(fragment_stream(vec![Err(ApplicationError::Gateway(
                "dead".into(),
            ))]))
        });

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("hi").await.unwrap();

        let turns = service.turns().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].text(), Some(REPLY_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn empty_stream_resolves_the_placeholder() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().returning(|_| Ok(()));
        chat.expect_stream_reply()
            .returning(|_| Ok(fragment_stream(vec![])));

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("hi").await.unwrap();

        let turns = service.turns().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].text(), Some(EMPTY_REPLY_MESSAGE));
        assert!(!turns[1].is_pending());
    }

    #[tokio::test]
    async fn lazy_open_failure_appends_terminal_turn() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session()
            .returning(|_| Err(ApplicationError::Gateway("no key".into())));

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("hi").await.unwrap();

        let turns = service.turns().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, MessageRole::User);
        assert_eq!(turns[1].role, MessageRole::Assistant);
        assert!(turns[1].text().unwrap().contains("could not start"));
        assert!(!service.is_open().await);
    }

    #[tokio::test]
    async fn session_is_not_recreated_between_sends() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().times(1).returning(|_| Ok(()));
        chat.expect_stream_reply()
            .returning(|_| Ok(fragment_stream(vec![Ok("ok")])));

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("one").await.unwrap();
        service.send_turn("two").await.unwrap();

        assert!(service.is_open().await);
    }

    #[tokio::test]
    async fn turns_are_strictly_append_ordered() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().returning(|_| Ok(()));
        chat.expect_stream_reply()
            .returning(|_| Ok(fragment_stream(vec![Ok("reply")])));

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("first").await.unwrap();
        service.send_turn("second").await.unwrap();

        let turns = service.turns().await;
        let roles: Vec<MessageRole> = turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
            ]
        );
    }

    #[tokio::test]
    async fn reply_context_excludes_the_placeholder() {
        let mut chat = MockChatPort::new();
        chat.expect_open_session().returning(|_| Ok(()));
        chat.expect_stream_reply()
            .withf(|conversation: &Conversation| {
                conversation.messages.iter().all(|m| !m.is_pending())
            })
            .returning(|_| Ok(fragment_stream(vec![Ok("ok")])));

        let service = ChatSessionService::new(Arc::new(chat), online());
        service.send_turn("hi").await.unwrap();
    }
}
