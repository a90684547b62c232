//! Transcript Assistant - summarize, question and translate YouTube videos
//!
//! This library fetches the caption transcript of a video, forwards it to an external
//! generative text API together with a mode-specific instruction, and exposes the result
//! over a small JSON HTTP API and a CLI.

pub mod cli;
pub mod config;
pub mod generation;
pub mod output;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod transcript;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use generation::{GenerationError, TextGenerator};
pub use pipeline::{PipelineError, PipelineMode, PipelineRequest, TextPipeline};
pub use service::AssistantService;
pub use transcript::{FetchError, Transcript, TranscriptFetcher, TranscriptFragment, TranscriptProvider};

/// Result type used throughout the binary and CLI commands
pub type Result<T> = anyhow::Result<T>;

/// Coarse classification of every failure a caller can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    TranscriptUnavailable,
    ProviderUnavailable,
    GenerationFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::TranscriptUnavailable => "transcript_unavailable",
            ErrorKind::ProviderUnavailable => "provider_unavailable",
            ErrorKind::GenerationFailed => "generation_failed",
        }
    }
}

/// Error types surfaced by the assistant operations
#[derive(thiserror::Error, Debug)]
pub enum AssistantError {
    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AssistantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssistantError::MalformedInput(_) => ErrorKind::MalformedInput,
            AssistantError::Fetch(err) => err.kind(),
            AssistantError::Pipeline(err) => err.kind(),
        }
    }
}
