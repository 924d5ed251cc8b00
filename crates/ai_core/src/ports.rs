//! Port definitions for the generative language client
//!
//! Defines the engine trait and the request/response/schema types shared
//! by adapters.

use std::pin::Pin;

use async_trait::async_trait;
use domain::{Conversation, MessageRole};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::GenerationError;

/// A message in a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMessage {
    /// "user" or "model"
    pub role: String,
    pub content: String,
}

/// Request for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Conversation turns, oldest first
    pub messages: Vec<GenerationMessage>,
    /// System persona/instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// Schema the response JSON must match (structured mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<ResponseSchema>,
    /// Temperature override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Token limit override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Create a single-turn request from a prompt
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            messages: vec![GenerationMessage {
                role: "user".to_string(),
                content: text.into(),
            }],
            system_instruction: None,
            response_schema: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Create a request carrying the full chat session context
    ///
    /// Unresolved placeholder turns are skipped; the persona becomes the
    /// system instruction.
    pub fn from_conversation(conversation: &Conversation) -> Self {
        let messages = conversation
            .messages
            .iter()
            .filter_map(|m| {
                let text = m.text()?;
                let role = match m.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                    MessageRole::System => return None,
                };
                Some(GenerationMessage {
                    role: role.to_string(),
                    content: text.to_string(),
                })
            })
            .collect();

        Self {
            messages,
            system_instruction: conversation.system_prompt.clone(),
            response_schema: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set the system instruction
    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Request structured JSON output matching a schema
    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Set temperature
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token limit
    pub const fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Value type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// JSON string
    String,
    /// JSON number
    Number,
}

impl FieldKind {
    const fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

/// A named field in a response schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// Field schema for structured JSON output
///
/// Named string/number fields with a required subset; rendered to the
/// JSON-Schema object the API expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseSchema {
    fields: Vec<SchemaField>,
}

impl ResponseSchema {
    /// Create an empty schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Add an optional field
    #[must_use]
    pub fn optional_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    /// Check whether the schema has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of all fields, in declaration order
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Render the schema as the JSON-Schema object the API expects
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                json!({ "type": field.kind.json_type() }),
            );
        }
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Response from a generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Generated content (raw JSON text in structured mode)
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Finish reason, if reported
    pub finish_reason: Option<String>,
}

/// A fragment of a streaming response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingChunk {
    /// Content delta
    pub content: String,
    /// Whether this is the final fragment
    pub done: bool,
}

/// Type alias for a streaming response
///
/// Finite and one-shot: the stream terminates normally or with an error
/// and cannot be restarted.
pub type GenerationStream =
    Pin<Box<dyn Stream<Item = Result<StreamingChunk, GenerationError>> + Send>>;

/// Port for generative engine implementations
#[async_trait]
pub trait GenerativeEngine: Send + Sync {
    /// Generate a complete response (non-streaming)
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;

    /// Generate a streaming response
    async fn generate_stream(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationStream, GenerationError>;

    /// Check whether the API is reachable with the configured credentials
    async fn health_check(&self) -> Result<bool, GenerationError>;

    /// Get the configured model name
    fn default_model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ChatMessage;

    #[test]
    fn prompt_builds_single_user_message() {
        let req = GenerationRequest::prompt("Hello");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(req.messages[0].content, "Hello");
        assert!(req.response_schema.is_none());
    }

    #[test]
    fn builder_chaining() {
        let req = GenerationRequest::prompt("Test")
            .with_system("Be terse")
            .with_temperature(0.3)
            .with_max_output_tokens(64);
        assert_eq!(req.system_instruction.as_deref(), Some("Be terse"));
        assert_eq!(req.temperature, Some(0.3));
        assert_eq!(req.max_output_tokens, Some(64));
    }

    #[test]
    fn from_conversation_maps_roles() {
        let mut conv = Conversation::with_system_prompt("persona");
        conv.add_user_message("question");
        conv.add_assistant_message("answer");

        let req = GenerationRequest::from_conversation(&conv);
        assert_eq!(req.system_instruction.as_deref(), Some("persona"));
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(req.messages[1].role, "model");
    }

    #[test]
    fn from_conversation_skips_pending_turns() {
        let mut conv = Conversation::new();
        conv.add_user_message("question");
        conv.begin_assistant_reply();

        let req = GenerationRequest::from_conversation(&conv);
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn from_conversation_skips_system_messages() {
        let mut conv = Conversation::new();
        conv.add_message(ChatMessage::system("instruction"));
        conv.add_user_message("question");

        let req = GenerationRequest::from_conversation(&conv);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
    }

    #[test]
    fn schema_renders_json_schema_object() {
        let schema = ResponseSchema::new()
            .field("status", FieldKind::String)
            .field("fare", FieldKind::Number)
            .optional_field("license_plate", FieldKind::String);

        let value = schema.to_json_value();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["status"]["type"], "string");
        assert_eq!(value["properties"]["fare"]["type"], "number");
        assert_eq!(value["properties"]["license_plate"]["type"], "string");

        let required = value["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.iter().any(|v| v == "status"));
        assert!(!required.iter().any(|v| v == "license_plate"));
    }

    #[test]
    fn empty_schema_is_empty() {
        let schema = ResponseSchema::new();
        assert!(schema.is_empty());
        assert!(schema.field_names().is_empty());
    }

    #[test]
    fn field_names_in_declaration_order() {
        let schema = ResponseSchema::new()
            .field("a", FieldKind::String)
            .field("b", FieldKind::Number);
        assert_eq!(schema.field_names(), vec!["a", "b"]);
    }

    #[test]
    fn request_serialization_skips_none_fields() {
        let req = GenerationRequest::prompt("Test");
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("system_instruction"));
        assert!(!json.contains("temperature"));
        assert!(!json.contains("response_schema"));
    }
}
