use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub mod gemini;
pub mod openai;

use crate::config::GenerationConfig;

/// Errors returned by a text generation backend
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("missing API key: set the {0} environment variable or generation.api_key")]
    MissingApiKey(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response was blocked: {0}")]
    Blocked(String),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("unreadable response: {0}")]
    InvalidResponse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GenerationError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Unavailable(_) => true,
            GenerationError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Supported generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    /// Any endpoint speaking the OpenAI chat completions protocol
    Openai,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Openai => "OpenAI",
        }
    }
}

/// Trait for external services that turn a prompt into text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a complete prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Get the name of the backing service
    fn provider_name(&self) -> &'static str;
}

/// Build the configured generator; called once at startup
pub fn build_generator(config: &GenerationConfig) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    let api_key = config.resolve_api_key()?;

    let generator: Arc<dyn TextGenerator> = match config.provider {
        ProviderKind::Gemini => Arc::new(gemini::GeminiGenerator::new(config, api_key)?),
        ProviderKind::Openai => Arc::new(openai::OpenAiGenerator::new(config, api_key)?),
    };

    tracing::info!(
        "Using {} text generation with model {}",
        generator.provider_name(),
        config.model
    );

    Ok(generator)
}

/// Build an HTTP client bounded by the configured timeout
pub(crate) fn http_client(config: &GenerationConfig) -> Result<reqwest::Client, GenerationError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| GenerationError::InvalidConfig(format!("failed to build HTTP client: {}", e)))
}

pub(crate) fn request_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Unavailable("generation request timed out".to_string())
    } else {
        GenerationError::Unavailable(format!("generation request failed: {}", err))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turn a non-success response body into an error, preferring the API's own message
pub(crate) fn api_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());

    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Run `attempt` until it succeeds, fails permanently, or retries are exhausted
pub(crate) async fn with_retries<T, F, Fut>(
    max_retries: u32,
    backoff: Duration,
    mut attempt: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut retries = 0u32;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && retries < max_retries => {
                retries += 1;
                let delay = backoff * retries;
                tracing::warn!(
                    "Generation attempt {} failed ({}), retrying in {:?}",
                    retries,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_transient_errors() {
        assert!(GenerationError::Unavailable("timed out".to_string()).is_transient());
        assert!(GenerationError::Api { status: 503, message: "overloaded".to_string() }.is_transient());
        assert!(GenerationError::Api { status: 429, message: "quota".to_string() }.is_transient());
        assert!(!GenerationError::Api { status: 400, message: "bad".to_string() }.is_transient());
        assert!(!GenerationError::EmptyResponse.is_transient());
        assert!(!GenerationError::InvalidResponse("expected value".to_string()).is_transient());
    }

    #[test]
    fn test_api_error_uses_api_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let err = api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.to_string(), "API returned HTTP 400: API key not valid.");

        let err = api_error(StatusCode::BAD_GATEWAY, "  upstream down \n");
        assert_eq!(err.to_string(), "API returned HTTP 502: upstream down");
    }

    #[tokio::test]
    async fn test_with_retries_recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result = with_retries(2, Duration::ZERO, move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(GenerationError::Unavailable("flaky".to_string()))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retries_gives_up() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<(), _> = with_retries(1, Duration::ZERO, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::Unavailable("down".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_retries_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<(), _> = with_retries(3, Duration::ZERO, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::Blocked("SAFETY".to_string()))
        })
        .await;

        assert!(matches!(result, Err(GenerationError::Blocked(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
