//! Streaming response handling for the SSE generation endpoint

use futures::stream::{self, StreamExt};
use reqwest::Response;
use serde::Deserialize;
use tracing::trace;

use crate::{
    error::GenerationError,
    ports::{GenerationStream, StreamingChunk},
};

/// One SSE event payload from the streaming endpoint
#[derive(Debug, Deserialize)]
struct SseChunk {
    #[serde(default)]
    candidates: Vec<SseCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SseCandidate {
    content: Option<SseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SseContent {
    #[serde(default)]
    parts: Vec<SsePart>,
}

#[derive(Debug, Deserialize)]
struct SsePart {
    #[serde(default)]
    text: String,
}

/// Create a streaming response from an HTTP response
pub fn create_stream(response: Response) -> GenerationStream {
    let byte_stream = response.bytes_stream();

    let chunk_stream = byte_stream
        .map(|result| match result {
            Ok(bytes) => parse_sse_chunks(&bytes),
            Err(e) => vec![Err(GenerationError::StreamError(e.to_string()))],
        })
        .flat_map(stream::iter);

    Box::pin(chunk_stream)
}

/// Parse `data:` lines from an SSE byte chunk
fn parse_sse_chunks(bytes: &[u8]) -> Vec<Result<StreamingChunk, GenerationError>> {
    let text = match std::str::from_utf8(bytes) {
        Ok(t) => t,
        Err(e) => {
            return vec![Err(GenerationError::InvalidResponse(format!(
                "Invalid UTF-8: {e}"
            )))];
        },
    };

    text.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|payload| !payload.is_empty() && *payload != "[DONE]")
        .map(|payload| {
            trace!(payload = %payload, "Parsing stream event");

            let chunk: SseChunk = serde_json::from_str(payload)
                .map_err(|e| GenerationError::InvalidResponse(format!("JSON parse error: {e}")))?;

            let candidate = chunk.candidates.into_iter().next();
            let content = candidate
                .as_ref()
                .and_then(|c| c.content.as_ref())
                .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<String>())
                .unwrap_or_default();
            let done = candidate.is_some_and(|c| c.finish_reason.is_some());

            Ok(StreamingChunk { content, done })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> String {
        format!(r#"data: {{"candidates":[{{"content":{{"parts":[{{"text":"{text}"}}]}}}}]}}"#)
    }

    #[test]
    fn parses_single_event() {
        let chunks = parse_sse_chunks(event("Hello").as_bytes());

        assert_eq!(chunks.len(), 1);
        let chunk = chunks[0].as_ref().unwrap();
        assert_eq!(chunk.content, "Hello");
        assert!(!chunk.done);
    }

    #[test]
    fn parses_multiple_events() {
        let body = format!("{}\n\n{}\n\n{}", event("Hel"), event("lo"), event("!"));
        let chunks = parse_sse_chunks(body.as_bytes());

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].as_ref().unwrap().content, "Hel");
        assert_eq!(chunks[1].as_ref().unwrap().content, "lo");
        assert_eq!(chunks[2].as_ref().unwrap().content, "!");
    }

    #[test]
    fn finish_reason_marks_done() {
        let body = r#"data: {"candidates":[{"content":{"parts":[{"text":"end"}]},"finishReason":"STOP"}]}"#;
        let chunks = parse_sse_chunks(body.as_bytes());

        let chunk = chunks[0].as_ref().unwrap();
        assert_eq!(chunk.content, "end");
        assert!(chunk.done);
    }

    #[test]
    fn ignores_non_data_lines() {
        let body = format!(": keep-alive\n\nevent: message\n{}", event("Hi"));
        let chunks = parse_sse_chunks(body.as_bytes());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().content, "Hi");
    }

    #[test]
    fn ignores_done_sentinel() {
        let body = format!("{}\n\ndata: [DONE]", event("Hi"));
        let chunks = parse_sse_chunks(body.as_bytes());

        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn handles_invalid_utf8() {
        let invalid_bytes = &[0xff, 0xfe, 0x00];
        let chunks = parse_sse_chunks(invalid_bytes);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_err());
    }

    #[test]
    fn handles_invalid_json() {
        let chunks = parse_sse_chunks(b"data: not valid json");

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_err());
    }

    #[test]
    fn handles_empty_input() {
        let chunks = parse_sse_chunks(b"");
        assert!(chunks.is_empty());
    }

    #[test]
    fn event_without_candidates_is_empty_fragment() {
        let chunks = parse_sse_chunks(br#"data: {"candidates":[]}"#);

        assert_eq!(chunks.len(), 1);
        let chunk = chunks[0].as_ref().unwrap();
        assert!(chunk.content.is_empty());
        assert!(!chunk.done);
    }

    #[test]
    fn multiple_parts_are_concatenated() {
        let body = r#"data: {"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]}"#;
        let chunks = parse_sse_chunks(body.as_bytes());

        assert_eq!(chunks[0].as_ref().unwrap().content, "ab");
    }
}
