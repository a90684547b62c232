use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{api_error, http_client, request_error, with_retries, GenerationError, TextGenerator};
use crate::config::GenerationConfig;

/// Client for OpenAI-compatible chat completion endpoints
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_retries: u32,
    retry_backoff: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: &GenerationConfig, api_key: String) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(config)?,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn request_once(&self, prompt: &str) -> Result<String, GenerationError> {
        tracing::debug!("Sending {} prompt characters to {}", prompt.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
            }))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let text = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        let completion: ChatCompletion = serde_json::from_str(&text)
            .map_err(|e| GenerationError::InvalidResponse(format!("chat completion: {}", e)))?;

        extract_content(completion)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        with_retries(self.max_retries, self.retry_backoff, || self.request_once(prompt)).await
    }

    fn provider_name(&self) -> &'static str {
        "OpenAI"
    }
}

fn extract_content(completion: ChatCompletion) -> Result<String, GenerationError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyResponse)?;

    match choice.message.and_then(|message| message.content) {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ if choice.finish_reason.as_deref() == Some("content_filter") => {
            Err(GenerationError::Blocked("content_filter".to_string()))
        }
        _ => Err(GenerationError::EmptyResponse),
    }
}
