use std::sync::Arc;

pub mod chunking;

use crate::config::PipelineConfig;
use crate::generation::{GenerationError, TextGenerator};
use crate::transcript::Transcript;
use crate::utils::word_count;
use crate::ErrorKind;

/// Returned instead of a summary when the transcript is below the word minimum
pub const TOO_SHORT_MESSAGE: &str = "The transcript is too short to generate a meaningful summary.";

/// The three generation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Summarize,
    Translate,
    Answer,
}

impl PipelineMode {
    /// Verb phrase used in user-facing error messages
    pub fn action(&self) -> &'static str {
        match self {
            PipelineMode::Summarize => "generating summary",
            PipelineMode::Translate => "translating text",
            PipelineMode::Answer => "answering question",
        }
    }
}

/// A unit of work for the text pipeline
#[derive(Debug, Clone)]
pub enum PipelineRequest {
    Summarize {
        transcript: Transcript,
    },
    Translate {
        text: String,
        target_language: String,
    },
    Answer {
        transcript: Transcript,
        question: String,
    },
}

impl PipelineRequest {
    pub fn mode(&self) -> PipelineMode {
        match self {
            PipelineRequest::Summarize { .. } => PipelineMode::Summarize,
            PipelineRequest::Translate { .. } => PipelineMode::Translate,
            PipelineRequest::Answer { .. } => PipelineMode::Answer,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Error {}: {source}", .mode.action())]
    GenerationFailed {
        mode: PipelineMode,
        source: GenerationError,
    },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::GenerationFailed { .. } => ErrorKind::GenerationFailed,
        }
    }
}

/// Turns transcripts and text into generated output through a [`TextGenerator`]
#[derive(Clone)]
pub struct TextPipeline {
    generator: Arc<dyn TextGenerator>,
    min_words: usize,
    window_tokens: Option<usize>,
}

impl TextPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &PipelineConfig) -> Self {
        Self {
            generator,
            min_words: config.min_words,
            window_tokens: config.window_tokens,
        }
    }

    /// Run one request against the generator
    pub async fn invoke(&self, request: &PipelineRequest) -> Result<String, PipelineError> {
        tracing::debug!("Pipeline request: {}", request.mode().action());

        match request {
            PipelineRequest::Summarize { transcript } => self.summarize(&transcript.text).await,
            PipelineRequest::Translate { text, target_language } => {
                self.generate(PipelineMode::Translate, translation_prompt(text, target_language))
                    .await
            }
            PipelineRequest::Answer { transcript, question } => {
                self.generate(PipelineMode::Answer, answer_prompt(&transcript.text, question))
                    .await
            }
        }
    }

    async fn summarize(&self, text: &str) -> Result<String, PipelineError> {
        let text = text.trim();
        let words = word_count(text);

        if words < self.min_words {
            tracing::info!(
                "Transcript has {} words (minimum {}), skipping summary generation",
                words,
                self.min_words
            );
            return Ok(TOO_SHORT_MESSAGE.to_string());
        }

        match self.window_tokens {
            Some(size) => self.summarize_windows(text, size).await,
            None => self.generate(PipelineMode::Summarize, summary_prompt(text)).await,
        }
    }

    /// Summarize each eligible window independently and join the results in order
    async fn summarize_windows(&self, text: &str, size: usize) -> Result<String, PipelineError> {
        let windows = chunking::eligible_windows(text, size, self.min_words);

        if windows.is_empty() {
            return Ok(TOO_SHORT_MESSAGE.to_string());
        }

        let mut summaries = Vec::with_capacity(windows.len());
        for (i, window) in windows.iter().enumerate() {
            tracing::debug!("Summarizing window {}/{}", i + 1, windows.len());
            summaries.push(self.generate(PipelineMode::Summarize, summary_prompt(window)).await?);
        }

        Ok(summaries.join(" "))
    }

    async fn generate(&self, mode: PipelineMode, prompt: String) -> Result<String, PipelineError> {
        match self.generator.generate(&prompt).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(source) => {
                tracing::error!("Generation failed while {}: {}", mode.action(), source);
                Err(PipelineError::GenerationFailed { mode, source })
            }
        }
    }
}

fn summary_prompt(transcript: &str) -> String {
    format!(
        "Please provide a concise and comprehensive summary of the following transcript.\n\
         Focus on the key points, main ideas, and most important information.\n\
         The summary should be clear, coherent, and capture the essence of the content:\n\n{}",
        transcript
    )
}

fn translation_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {}.\n\
         Ensure the translation is natural, fluent, and maintains the original meaning:\n\n{}",
        target_language, text
    )
}

fn answer_prompt(transcript: &str, question: &str) -> String {
    format!(
        "Based on the following transcript, please answer the question as accurately and concisely as possible:\n\n\
         Transcript:\n{}\n\n\
         Question: {}\n\n\
         Answer:",
        transcript, question
    )
}
