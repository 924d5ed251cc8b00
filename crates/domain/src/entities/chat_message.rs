//! Chat message entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of the message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the assistant
    Assistant,
    /// System persona or instruction
    System,
}

/// Message body, with an explicit tag for a reply that has not arrived yet
///
/// A streaming assistant turn starts as `Pending` and is overwritten in
/// place as fragments arrive. The tag makes "is this the placeholder"
/// a direct check instead of content sniffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageContent {
    /// Reply placeholder awaiting streamed content
    Pending,
    /// Resolved message text
    Text(String),
}

impl MessageContent {
    /// Check whether this is the unresolved placeholder
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Get the text, if resolved
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Pending => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// A single turn in the chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier
    pub id: Uuid,
    /// Role of the sender
    pub role: MessageRole,
    /// Message body
    pub content: MessageContent,
    /// When the message was created
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: MessageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, MessageContent::Text(content.into()))
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, MessageContent::Text(content.into()))
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, MessageContent::Text(content.into()))
    }

    /// Create the placeholder for a streaming assistant reply
    pub fn pending_assistant() -> Self {
        Self::new(MessageRole::Assistant, MessageContent::Pending)
    }

    /// Check whether this message is an unresolved placeholder
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.content.is_pending()
    }

    /// Get the message text, if resolved
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.text()
    }
}
