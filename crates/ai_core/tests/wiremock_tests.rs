//! Integration tests for the Gemini-style engine using WireMock
//!
//! These tests mock the generative language HTTP API to verify client
//! behavior without talking to the real service.

use ai_core::{
    FieldKind, GenAiConfig, GeminiEngine, GenerationError, GenerationRequest, GenerativeEngine,
    ResponseSchema,
};
use futures::StreamExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn config_for_mock(base_url: &str) -> GenAiConfig {
    GenAiConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        timeout_ms: 5000,
        max_output_tokens: 256,
        temperature: 0.7,
    }
}

const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";
const STREAM_PATH: &str = "/v1beta/models/test-model:streamGenerateContent";

/// Sample successful generation response
fn generate_success_response() -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": "Hello! How can I help you today?"}]
            },
            "finishReason": "STOP"
        }]
    })
}

/// SSE body with three fragments
fn sse_body() -> String {
    concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"!\"}]},\"finishReason\":\"STOP\"}]}\n\n",
    )
    .to_string()
}

// =============================================================================
// Generate Tests
// =============================================================================

#[tokio::test]
async fn generate_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_success_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let response = engine.generate(GenerationRequest::prompt("Hello")).await;

    let response = response.expect("generation should succeed");
    assert_eq!(response.content, "Hello! How can I help you today?");
    assert_eq!(response.model, "test-model");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
}

#[tokio::test]
async fn generate_sends_system_instruction_and_schema() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(serde_json::json!({
            "systemInstruction": {"parts": [{"text": "You are a dispatcher"}]},
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"status\":\"matched\"}"}]}
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let request = GenerationRequest::prompt("find a ride")
        .with_system("You are a dispatcher")
        .with_schema(ResponseSchema::new().field("status", FieldKind::String));

    let response = engine.generate(request).await.expect("success");
    assert!(response.content.contains("matched"));
}

#[tokio::test]
async fn generate_without_api_key_fails_fast() {
    let mock_server = MockServer::start().await;

    // No mock mounted: the request must never be issued.
    let mut config = config_for_mock(&mock_server.uri());
    config.api_key = String::new();

    let engine = GeminiEngine::new(config).expect("engine");
    let result = engine.generate(GenerationRequest::prompt("Hello")).await;

    assert!(matches!(result, Err(GenerationError::ApiKeyMissing)));
}

#[tokio::test]
async fn generate_server_error_maps_to_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let result = engine.generate(GenerationRequest::prompt("Hello")).await;

    assert!(matches!(result, Err(GenerationError::ServerError(_))));
}

#[tokio::test]
async fn generate_429_maps_to_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let result = engine.generate(GenerationRequest::prompt("Hello")).await;

    assert!(matches!(result, Err(GenerationError::RateLimited)));
}

#[tokio::test]
async fn generate_malformed_body_maps_to_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let result = engine.generate(GenerationRequest::prompt("Hello")).await;

    assert!(matches!(result, Err(GenerationError::InvalidResponse(_))));
}

#[tokio::test]
async fn generate_without_candidates_maps_to_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
        )
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let result = engine.generate(GenerationRequest::prompt("Hello")).await;

    assert!(matches!(result, Err(GenerationError::EmptyResponse)));
}

#[tokio::test]
async fn generate_with_blank_content_maps_to_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": []}}]
        })))
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let result = engine.generate(GenerationRequest::prompt("Hello")).await;

    assert!(matches!(result, Err(GenerationError::EmptyResponse)));
}

// =============================================================================
// Streaming Tests
// =============================================================================

#[tokio::test]
async fn stream_yields_fragments_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("alt", "sse"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let stream = engine
        .generate_stream(GenerationRequest::prompt("Hello"))
        .await
        .expect("stream should open");

    let chunks: Vec<_> = stream.collect().await;
    let fragments: Vec<String> = chunks
        .into_iter()
        .map(|c| c.expect("chunk").content)
        .collect();

    assert_eq!(fragments, vec!["Hel", "lo", "!"]);
}

#[tokio::test]
async fn stream_final_fragment_is_done() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body()),
        )
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let stream = engine
        .generate_stream(GenerationRequest::prompt("Hello"))
        .await
        .expect("stream should open");

    let chunks: Vec<_> = stream.collect().await;
    let last = chunks.last().expect("at least one chunk");
    assert!(last.as_ref().expect("chunk").done);
}

#[tokio::test]
async fn stream_request_error_surfaces_before_streaming() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    let result = engine
        .generate_stream(GenerationRequest::prompt("Hello"))
        .await;

    assert!(matches!(result, Err(GenerationError::ServerError(_))));
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn health_check_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": []})))
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    assert!(engine.health_check().await.expect("health check"));
}

#[tokio::test]
async fn health_check_unhealthy_on_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let engine = GeminiEngine::new(config_for_mock(&mock_server.uri())).expect("engine");
    assert!(!engine.health_check().await.expect("health check"));
}

#[tokio::test]
async fn health_check_without_api_key_fails() {
    let mock_server = MockServer::start().await;

    let mut config = config_for_mock(&mock_server.uri());
    config.api_key = String::new();

    let engine = GeminiEngine::new(config).expect("engine");
    let result = engine.health_check().await;

    assert!(matches!(result, Err(GenerationError::ApiKeyMissing)));
}
