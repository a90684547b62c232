use anyhow::Context;
use std::sync::Arc;

use crate::config::Config;
use crate::generation::build_generator;
use crate::pipeline::{PipelineRequest, TextPipeline};
use crate::transcript::youtube::YoutubeTranscriptProvider;
use crate::transcript::{TranscriptFetcher, TranscriptProvider};
use crate::utils::normalize_language;
use crate::AssistantError;

/// Orchestrates transcript retrieval and text generation for each operation
///
/// Holds only immutable handles, so one instance is built at startup and shared by
/// every request.
#[derive(Clone)]
pub struct AssistantService {
    fetcher: TranscriptFetcher,
    pipeline: TextPipeline,
    default_target_language: String,
}

impl AssistantService {
    pub fn new(
        fetcher: TranscriptFetcher,
        pipeline: TextPipeline,
        default_target_language: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            pipeline,
            default_target_language: default_target_language.into(),
        }
    }

    /// Build the YouTube provider and the configured generator
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let provider = YoutubeTranscriptProvider::new(&config.transcript)
            .context("Failed to initialize transcript provider")?;
        tracing::info!("Using {} transcripts", provider.provider_name());

        let generator = build_generator(&config.generation)
            .context("Failed to initialize text generation client")?;

        Ok(Self::new(
            TranscriptFetcher::new(Arc::new(provider)),
            TextPipeline::new(generator, &config.pipeline),
            normalize_language(&config.pipeline.default_target_language),
        ))
    }

    /// Summarize the transcript of a video
    pub async fn summarize(&self, video_url: &str) -> Result<String, AssistantError> {
        let transcript = self.fetcher.fetch(video_url).await?;

        tracing::info!("Generating summary for video {}", transcript.video_id);
        let summary = self
            .pipeline
            .invoke(&PipelineRequest::Summarize { transcript })
            .await?;

        Ok(summary)
    }

    /// Answer a question about a video
    pub async fn ask(&self, video_url: &str, question: &str) -> Result<String, AssistantError> {
        let transcript = self.fetcher.fetch(video_url).await?;

        tracing::info!("Answering question for video {}", transcript.video_id);
        let answer = self
            .pipeline
            .invoke(&PipelineRequest::Answer {
                transcript,
                question: question.to_string(),
            })
            .await?;

        Ok(answer)
    }

    /// Translate text; no transcript is involved
    pub async fn translate(
        &self,
        text: &str,
        target_language: Option<&str>,
    ) -> Result<String, AssistantError> {
        let target_language = target_language
            .map(normalize_language)
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| self.default_target_language.clone());

        tracing::info!("Translating {} words to {}", crate::utils::word_count(text), target_language);
        let translated = self
            .pipeline
            .invoke(&PipelineRequest::Translate {
                text: text.to_string(),
                target_language,
            })
            .await?;

        Ok(translated)
    }
}
