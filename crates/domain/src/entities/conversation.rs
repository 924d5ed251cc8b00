//! Conversation entity - The single chat session context
//!
//! Turns are strictly append-ordered. The only turn that is ever mutated
//! after creation is the most recent assistant turn while its reply
//! stream is in flight; the `fill_streaming` helper enforces that rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChatMessage, MessageContent, MessageRole};
use crate::value_objects::ConversationId;

/// A conversation containing a sequence of messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier
    pub id: ConversationId,
    /// Messages in the conversation (oldest first)
    pub messages: Vec<ChatMessage>,
    /// When the conversation started
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated
    pub updated_at: DateTime<Utc>,
    /// System persona for this conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Conversation {
    /// Create a new empty conversation
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            system_prompt: None,
        }
    }

    /// Create a new conversation with a system persona
    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.system_prompt = Some(system_prompt.into());
        conv
    }

    /// Add a message to the conversation
    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Add a user message
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::user(content));
    }

    /// Add an assistant message
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::assistant(content));
    }

    /// Append the placeholder for a streaming assistant reply
    ///
    /// Returns the placeholder's message id, which `fill_streaming` uses
    /// to make sure only this reply is ever overwritten.
    pub fn begin_assistant_reply(&mut self) -> Uuid {
        let placeholder = ChatMessage::pending_assistant();
        let id = placeholder.id;
        self.add_message(placeholder);
        id
    }

    /// Replace the in-flight assistant reply with accumulated content
    ///
    /// Applies only while the reply identified by `reply_id` is still the
    /// most recent turn. Returns whether the update was applied.
    pub fn fill_streaming(&mut self, reply_id: Uuid, content: impl Into<String>) -> bool {
        let Some(last) = self.messages.last_mut() else {
            return false;
        };
        if last.id != reply_id || last.role != MessageRole::Assistant {
            return false;
        }
        last.content = MessageContent::Text(content.into());
        self.updated_at = Utc::now();
        true
    }

    /// Check whether the reply is still the unresolved trailing placeholder
    #[must_use]
    pub fn has_unresolved(&self, reply_id: Uuid) -> bool {
        self.messages
            .last()
            .is_some_and(|m| m.id == reply_id && m.is_pending())
    }

    /// Get the last message in the conversation
    #[must_use]
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Get the number of messages
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Check if the conversation is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_is_empty() {
        let conv = Conversation::new();
        assert!(conv.is_empty());
        assert_eq!(conv.message_count(), 0);
    }

    #[test]
    fn messages_can_be_added() {
        let mut conv = Conversation::new();
        conv.add_user_message("Hello");
        conv.add_assistant_message("Hi there!");

        assert_eq!(conv.message_count(), 2);
        assert_eq!(conv.last_message().unwrap().text(), Some("Hi there!"));
    }

    #[test]
    fn with_system_prompt_sets_persona() {
        let conv = Conversation::with_system_prompt("You are a dispatcher.");
        assert_eq!(conv.system_prompt.as_deref(), Some("You are a dispatcher."));
    }

    #[test]
    fn begin_assistant_reply_appends_pending_turn() {
        let mut conv = Conversation::new();
        conv.add_user_message("Hi");
        let id = conv.begin_assistant_reply();

        assert_eq!(conv.message_count(), 2);
        assert!(conv.has_unresolved(id));
    }

    #[test]
    fn fill_streaming_replaces_in_place() {
        let mut conv = Conversation::new();
        conv.add_user_message("Hi");
        let id = conv.begin_assistant_reply();

        assert!(conv.fill_streaming(id, "Hel"));
        assert!(conv.fill_streaming(id, "Hello"));
        assert!(conv.fill_streaming(id, "Hello!"));

        assert_eq!(conv.message_count(), 2);
        assert_eq!(conv.last_message().unwrap().text(), Some("Hello!"));
        assert!(!conv.has_unresolved(id));
    }

    #[test]
    fn fill_streaming_refuses_when_not_last() {
        let mut conv = Conversation::new();
        let id = conv.begin_assistant_reply();
        conv.add_user_message("interleaved");

        assert!(!conv.fill_streaming(id, "too late"));
        assert_eq!(conv.messages[0].text(), None);
    }

    #[test]
    fn fill_streaming_refuses_unknown_id() {
        let mut conv = Conversation::new();
        conv.begin_assistant_reply();

        assert!(!conv.fill_streaming(Uuid::new_v4(), "spoofed"));
    }

    #[test]
    fn fill_streaming_on_empty_conversation_is_noop() {
        let mut conv = Conversation::new();
        assert!(!conv.fill_streaming(Uuid::new_v4(), "nothing here"));
    }

    #[test]
    fn has_unresolved_false_after_resolution() {
        let mut conv = Conversation::new();
        let id = conv.begin_assistant_reply();
        conv.fill_streaming(id, "done");
        assert!(!conv.has_unresolved(id));
    }

    #[test]
    fn add_message_updates_timestamp() {
        let mut conv = Conversation::new();
        let before = conv.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        conv.add_user_message("Hello");
        assert!(conv.updated_at > before);
    }

    #[test]
    fn conversation_has_unique_id() {
        let conv1 = Conversation::new();
        let conv2 = Conversation::new();
        assert_ne!(conv1.id, conv2.id);
    }

    #[test]
    fn default_creates_new_conversation() {
        let conv = Conversation::default();
        assert!(conv.is_empty());
        assert!(conv.system_prompt.is_none());
    }
}
