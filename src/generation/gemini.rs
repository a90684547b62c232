use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{api_error, http_client, request_error, with_retries, GenerationError, TextGenerator};
use crate::config::GenerationConfig;

/// Google Gemini `generateContent` client
pub struct GeminiGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    max_retries: u32,
    retry_backoff: Duration,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiGenerator {
    pub fn new(config: &GenerationConfig, api_key: String) -> Result<Self, GenerationError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client: http_client(config)?,
            endpoint,
            api_key,
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn request_once(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!("Sending {} prompt characters to {}", prompt.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let text = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::InvalidResponse(format!("Gemini: {}", e)))?;

        extract_text(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        with_retries(self.max_retries, self.retry_backoff, || self.request_once(prompt)).await
    }

    fn provider_name(&self) -> &'static str {
        "Gemini"
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(GenerationError::Blocked(reason));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
            Err(GenerationError::Blocked(reason.to_string()))
        }
        _ => Err(GenerationError::EmptyResponse),
    }
}
