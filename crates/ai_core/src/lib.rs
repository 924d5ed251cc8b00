//! AI Core - Generative language API client
//!
//! Provides the abstraction over the hosted text-generation service that
//! role-plays dispatch and chat for the demo: structured JSON responses
//! against a field schema, and one-shot streamed chat replies.

pub mod config;
pub mod error;
pub mod gemini;
pub mod ports;

pub use config::GenAiConfig;
pub use error::GenerationError;
pub use gemini::GeminiEngine;
pub use ports::{
    FieldKind, GenerationRequest, GenerationResponse, GenerationStream, GenerativeEngine,
    ResponseSchema, StreamingChunk,
};
