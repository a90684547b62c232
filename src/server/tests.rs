//! Server Module Tests
//!
//! Drives the router in-process with stubbed transcript and generation providers.
//!
//! ## Test Scopes
//! - **Validation**: Missing fields are rejected before any provider call.
//! - **Short-circuit**: Transcript failures never reach the generator.
//! - **Envelopes**: Success and error bodies keep their documented shape.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use super::router;
use crate::config::PipelineConfig;
use crate::generation::{GenerationError, MockTextGenerator};
use crate::pipeline::{TextPipeline, TOO_SHORT_MESSAGE};
use crate::service::AssistantService;
use crate::transcript::{FetchError, MockTranscriptProvider, TranscriptFetcher, TranscriptFragment};

const FIXED_SUMMARY: &str = "A fixed summary of the video.";

fn app(provider: MockTranscriptProvider, generator: MockTextGenerator) -> Router {
    let service = AssistantService::new(
        TranscriptFetcher::new(Arc::new(provider)),
        TextPipeline::new(Arc::new(generator), &PipelineConfig::default()),
        "Hindi",
    );
    router(Arc::new(service))
}

/// Provider and generator that must not be called
fn untouched() -> (MockTranscriptProvider, MockTextGenerator) {
    let mut provider = MockTranscriptProvider::new();
    provider.expect_fetch_fragments().times(0);
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(0);
    (provider, generator)
}

fn transcript_of(words: usize) -> Vec<TranscriptFragment> {
    (0..words)
        .map(|i| TranscriptFragment::new(format!("word{}", i), i as f64, 1.0))
        .collect()
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================
// END-TO-END SCENARIOS
// ============================================================

#[tokio::test]
async fn test_summarize_success() {
    let mut provider = MockTranscriptProvider::new();
    provider
        .expect_fetch_fragments()
        .withf(|video_id: &str| video_id == "ABC123")
        .times(1)
        .returning(|_| Ok(transcript_of(40)));
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|_| Ok(FIXED_SUMMARY.to_string()));

    let (status, body) = post(
        app(provider, generator),
        "/summarize",
        r#"{"video_url": "https://x/watch?v=ABC123&t=5"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": FIXED_SUMMARY }));
}

#[tokio::test]
async fn test_ask_transcript_unavailable_skips_generation() {
    let mut provider = MockTranscriptProvider::new();
    provider
        .expect_fetch_fragments()
        .times(1)
        .returning(|_| Err(FetchError::NoTranscript("video is unavailable".to_string())));
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(0);

    let (status, body) = post(
        app(provider, generator),
        "/ask",
        r#"{"video_url": "https://x/watch?v=gone", "question": "What is X?"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Error fetching transcript: video is unavailable" }));
}

#[tokio::test]
async fn test_translate_missing_text() {
    let (provider, generator) = untouched();

    let (status, body) = post(app(provider, generator), "/translate", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No text provided for translation" }));
}

// ============================================================
// VALIDATION
// ============================================================

#[tokio::test]
async fn test_summarize_missing_or_empty_url() {
    for payload in [r#"{}"#, r#"{"video_url": ""}"#, r#"{"video_url": "   "}"#] {
        let (provider, generator) = untouched();
        let (status, body) = post(app(provider, generator), "/summarize", payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No video URL provided");
    }
}

#[tokio::test]
async fn test_ask_requires_url_and_question() {
    for payload in [
        r#"{"video_url": "https://x/watch?v=ABC"}"#,
        r#"{"question": "Why?"}"#,
        r#"{"video_url": "https://x/watch?v=ABC", "question": ""}"#,
    ] {
        let (provider, generator) = untouched();
        let (status, body) = post(app(provider, generator), "/ask", payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Video URL or question not provided");
    }
}

#[tokio::test]
async fn test_unparseable_body_is_rejected() {
    let (provider, generator) = untouched();

    let (status, body) = post(app(provider, generator), "/summarize", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_malformed_reference_never_reaches_providers() {
    let (provider, generator) = untouched();

    let (status, body) = post(
        app(provider, generator),
        "/summarize",
        r#"{"video_url": "https://youtu.be/ABC123"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Error fetching transcript: "));
}

// ============================================================
// PIPELINE OUTCOMES
// ============================================================

#[tokio::test]
async fn test_short_transcript_returns_informational_summary() {
    let mut provider = MockTranscriptProvider::new();
    provider.expect_fetch_fragments().returning(|_| Ok(transcript_of(10)));
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(0);

    let (status, body) = post(
        app(provider, generator),
        "/summarize",
        r#"{"video_url": "https://x/watch?v=short"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], TOO_SHORT_MESSAGE);
}

#[tokio::test]
async fn test_generation_failure_maps_to_400() {
    let mut provider = MockTranscriptProvider::new();
    provider.expect_fetch_fragments().returning(|_| Ok(transcript_of(40)));
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .returning(|_| Err(GenerationError::Blocked("SAFETY".to_string())));

    let (status, body) = post(
        app(provider, generator),
        "/summarize",
        r#"{"video_url": "https://x/watch?v=ABC"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Error generating summary: response was blocked: SAFETY");
}

#[tokio::test]
async fn test_answer_mentioning_error_is_still_success() {
    let mut provider = MockTranscriptProvider::new();
    provider.expect_fetch_fragments().returning(|_| Ok(transcript_of(5)));
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .returning(|_| Ok("Error codes are explained at minute three.".to_string()));

    let (status, body) = post(
        app(provider, generator),
        "/ask",
        r#"{"video_url": "https://x/watch?v=ABC", "question": "Where are errors explained?"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "answer": "Error codes are explained at minute three." }));
}

#[tokio::test]
async fn test_translate_is_deterministic_and_skips_transcripts() {
    let mut provider = MockTranscriptProvider::new();
    provider.expect_fetch_fragments().times(0);
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .withf(|prompt: &str| prompt.contains("to Hindi") && prompt.ends_with("Good morning"))
        .times(2)
        .returning(|_| Ok("सुप्रभात".to_string()));

    let app = app(provider, generator);
    let (first_status, first) = post(app.clone(), "/translate", r#"{"text": "Good morning"}"#).await;
    let (second_status, second) = post(app, "/translate", r#"{"text": "Good morning"}"#).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(first, json!({ "translated_text": "सुप्रभात" }));
}

#[tokio::test]
async fn test_translate_honours_requested_language() {
    let mut provider = MockTranscriptProvider::new();
    provider.expect_fetch_fragments().times(0);
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .withf(|prompt: &str| prompt.contains("to French"))
        .times(1)
        .returning(|_| Ok("Bonjour".to_string()));

    let (status, body) = post(
        app(provider, generator),
        "/translate",
        r#"{"text": "Good morning", "target_language": "fr"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated_text"], "Bonjour");
}

#[tokio::test]
async fn test_health() {
    let (provider, generator) = untouched();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app(provider, generator).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
