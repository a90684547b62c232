use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod youtube;

use crate::ErrorKind;

/// Marker that precedes the video identifier in a reference
const VIDEO_ID_MARKER: &str = "v=";

/// Delimiter that terminates the video identifier
const VIDEO_ID_DELIMITER: char = '&';

/// Errors produced while retrieving a transcript
///
/// Every variant renders with the same `Error fetching transcript:` prefix so callers
/// receive a stable human-readable message, while the variant itself drives control flow.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Error fetching transcript: no video id found in {0:?}")]
    MalformedReference(String),

    #[error("Error fetching transcript: {0}")]
    NoTranscript(String),

    #[error("Error fetching transcript: {0}")]
    ProviderUnavailable(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::MalformedReference(_) | FetchError::NoTranscript(_) => {
                ErrorKind::TranscriptUnavailable
            }
            FetchError::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
        }
    }
}

/// A single timed caption unit as returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    /// Caption text
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl TranscriptFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Full transcript text of one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub text: String,
}

impl Transcript {
    pub fn new(video_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            text: text.into(),
        }
    }

    pub fn from_fragments(video_id: impl Into<String>, fragments: &[TranscriptFragment]) -> Self {
        Self::new(video_id, join_fragments(fragments))
    }

    pub fn word_count(&self) -> usize {
        crate::utils::word_count(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Source of timed transcript fragments for a video id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Retrieve the ordered caption fragments of a video
    async fn fetch_fragments(&self, video_id: &str) -> Result<Vec<TranscriptFragment>, FetchError>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Extract the video identifier from a reference such as `https://host/watch?v=ID&t=5`
pub fn extract_video_id(reference: &str) -> Option<&str> {
    let (_, rest) = reference.split_once(VIDEO_ID_MARKER)?;
    let id = rest.split(VIDEO_ID_DELIMITER).next().unwrap_or_default().trim();

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Join fragment texts with single spaces, trimming each and dropping empty ones
pub fn join_fragments(fragments: &[TranscriptFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves video references into transcripts using a provider
#[derive(Clone)]
pub struct TranscriptFetcher {
    provider: Arc<dyn TranscriptProvider>,
}

impl TranscriptFetcher {
    pub fn new(provider: Arc<dyn TranscriptProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and concatenate the transcript for a video reference
    pub async fn fetch(&self, reference: &str) -> Result<Transcript, FetchError> {
        let video_id = extract_video_id(reference)
            .ok_or_else(|| FetchError::MalformedReference(reference.to_string()))?;

        tracing::info!("Fetching transcript for video: {}", video_id);

        let fragments = self.provider.fetch_fragments(video_id).await?;
        let transcript = Transcript::from_fragments(video_id, &fragments);

        tracing::debug!(
            "Fetched {} fragments ({} words) for video {}",
            fragments.len(),
            transcript.word_count(),
            video_id
        );

        if transcript.is_empty() {
            tracing::warn!("Transcript for video {} contains no text", video_id);
        }

        Ok(transcript)
    }
}
