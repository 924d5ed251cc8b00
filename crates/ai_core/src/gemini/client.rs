//! Gemini-style generative language API client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::GenAiConfig;
use crate::error::GenerationError;
use crate::ports::{GenerationRequest, GenerationResponse, GenerationStream, GenerativeEngine};

use super::streaming::create_stream;

/// Engine backed by a hosted Gemini-style REST API
///
/// Structured mode sets a JSON response MIME type plus a response schema;
/// chat mode streams fragments over SSE.
pub struct GeminiEngine {
    client: Client,
    config: GenAiConfig,
}

impl std::fmt::Debug for GeminiEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiEngine {
    /// Create a new engine
    pub fn new(config: GenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GenerationError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized generative language engine"
        );

        Ok(Self { client, config })
    }

    /// Build the API URL for a model action
    fn model_url(&self, action: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            action
        )
    }

    fn build_wire_request(&self, request: &GenerationRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(m.role.clone()),
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        let response_schema = request.response_schema.as_ref().map(|s| s.to_json_value());

        GeminiRequest {
            contents,
            system_instruction: request.system_instruction.as_ref().map(|text| {
                GeminiSystemInstruction {
                    parts: vec![GeminiPart { text: text.clone() }],
                }
            }),
            generation_config: Some(GeminiGenerationConfig {
                temperature: Some(request.temperature.unwrap_or(self.config.temperature)),
                max_output_tokens: Some(
                    request
                        .max_output_tokens
                        .unwrap_or(self.config.max_output_tokens),
                ),
                response_mime_type: response_schema
                    .as_ref()
                    .map(|_| "application/json".to_string()),
                response_schema,
            }),
        }
    }

    async fn error_for_status(
        status: StatusCode,
        response: reqwest::Response,
    ) -> GenerationError {
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Generation request failed");
        match status {
            StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
            s if s.is_server_error() => GenerationError::ServerError(format!("Status {s}: {body}")),
            s => GenerationError::RequestFailed(format!("Status {s}: {body}")),
        }
    }
}

/// Wire-format generation request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

/// Wire-format generation response
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContentData>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentData {
    #[serde(default)]
    parts: Vec<GeminiPartData>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartData {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GenerativeEngine for GeminiEngine {
    #[instrument(skip(self, request), fields(model = %self.config.model, structured = request.response_schema.is_some()))]
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        if !self.config.has_api_key() {
            return Err(GenerationError::ApiKeyMissing);
        }

        let wire_request = self.build_wire_request(&request);

        debug!("Sending generation request");

        let response = self
            .client
            .post(self.model_url("generateContent"))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&wire_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_for_status(status, response).await);
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let Some(candidate) = body.candidates.into_iter().next() else {
            return Err(GenerationError::EmptyResponse);
        };

        let content: String = candidate
            .content
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!(chars = content.len(), "Generation completed");

        Ok(GenerationResponse {
            content,
            model: self.config.model.clone(),
            finish_reason: candidate.finish_reason,
        })
    }

    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn generate_stream(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationStream, GenerationError> {
        if !self.config.has_api_key() {
            return Err(GenerationError::ApiKeyMissing);
        }

        let wire_request = self.build_wire_request(&request);

        debug!("Starting streaming generation request");

        let response = self
            .client
            .post(self.model_url("streamGenerateContent"))
            .query(&[
                ("alt", "sse"),
                ("key", self.config.api_key.as_str()),
            ])
            .json(&wire_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_for_status(status, response).await);
        }

        Ok(create_stream(response))
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, GenerationError> {
        if !self.config.has_api_key() {
            return Err(GenerationError::ApiKeyMissing);
        }

        let response = self
            .client
            .get(format!(
                "{}/v1beta/models",
                self.config.base_url.trim_end_matches('/')
            ))
            .query(&[("key", self.config.api_key.as_str())])
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) if e.is_connect() => Ok(false),
            Err(e) => Err(GenerationError::RequestFailed(e.to_string())),
        }
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}
