use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{FetchError, TranscriptFragment, TranscriptProvider};
use crate::config::TranscriptConfig;

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";
const PLAYABLE_MARKER: &str = "\"playabilityStatus\":{\"status\":\"OK\"";
const AUTO_GENERATED_KIND: &str = "asr";

/// Caption track advertised by the watch page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some(AUTO_GENERATED_KIND)
    }
}

/// YouTube `json3` timed text document
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<TimedTextSegment>>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

/// YouTube caption provider reading the tracks listed on the watch page
pub struct YoutubeTranscriptProvider {
    client: Client,
    watch_url: String,
    languages: Vec<String>,
}

impl YoutubeTranscriptProvider {
    pub fn new(config: &TranscriptConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::ProviderUnavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            watch_url: config.watch_url.clone(),
            languages: config.languages.clone(),
        })
    }

    /// Download the watch page HTML for a video
    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, FetchError> {
        let url = Url::parse_with_params(&self.watch_url, &[("v", video_id)])
            .map_err(|e| FetchError::ProviderUnavailable(format!("invalid watch URL: {}", e)))?;

        tracing::debug!("Requesting watch page: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en-US")
            .send()
            .await
            .map_err(request_error)?;

        check_status(response.status())?;
        response.text().await.map_err(request_error)
    }

    /// Download and decode the timed text of a caption track
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TranscriptFragment>, FetchError> {
        let url = timedtext_url(&track.base_url)?;

        tracing::debug!("Requesting {} captions for track", track.language_code);

        let response = self.client.get(url).send().await.map_err(request_error)?;
        check_status(response.status())?;

        let body = response.text().await.map_err(request_error)?;
        parse_timed_text(&body)
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscriptProvider {
    async fn fetch_fragments(&self, video_id: &str) -> Result<Vec<TranscriptFragment>, FetchError> {
        let html = self.fetch_watch_page(video_id).await?;
        let tracks = extract_caption_tracks(&html)?;

        let track = select_track(&tracks, &self.languages)
            .ok_or_else(|| FetchError::NoTranscript(format!("no caption tracks for video {}", video_id)))?;

        tracing::debug!(
            "Selected caption track {} (generated: {}) out of {}",
            track.language_code,
            track.is_generated(),
            tracks.len()
        );

        self.fetch_track(track).await
    }

    fn provider_name(&self) -> &'static str {
        "YouTube"
    }
}

fn request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::ProviderUnavailable("request to YouTube timed out".to_string())
    } else {
        FetchError::ProviderUnavailable(format!("request to YouTube failed: {}", err))
    }
}

fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::ProviderUnavailable(
            "YouTube is rate limiting requests".to_string(),
        ));
    }

    if !status.is_success() {
        return Err(FetchError::ProviderUnavailable(format!("YouTube responded with HTTP {}", status)));
    }

    Ok(())
}

/// Locate and decode the caption track list embedded in a watch page
fn extract_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, FetchError> {
    let Some(start) = html.find(CAPTION_TRACKS_KEY) else {
        if html.contains(RECAPTCHA_MARKER) {
            return Err(FetchError::ProviderUnavailable(
                "YouTube is rate limiting requests".to_string(),
            ));
        }
        if !html.contains(PLAYABLE_MARKER) {
            return Err(FetchError::NoTranscript("video is unavailable".to_string()));
        }
        return Err(FetchError::NoTranscript("transcripts are disabled for this video".to_string()));
    };

    // The array is followed by the rest of the player response; stop after the first value
    let mut deserializer = serde_json::Deserializer::from_str(&html[start + CAPTION_TRACKS_KEY.len()..]);

    Vec::<CaptionTrack>::deserialize(&mut deserializer)
        .map_err(|e| FetchError::ProviderUnavailable(format!("unreadable caption track list: {}", e)))
}

/// Choose the best track: manual in preference order, then generated, then anything
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    let by_language = move |generated: bool| {
        languages.iter().find_map(|lang| {
            tracks
                .iter()
                .find(|track| track.language_code == *lang && track.is_generated() == generated)
        })
    };

    by_language(false)
        .or_else(|| by_language(true))
        .or_else(|| tracks.first())
}

/// Build the `json3` timed text URL for a track
fn timedtext_url(base_url: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| FetchError::ProviderUnavailable(format!("invalid caption URL: {}", e)))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut().clear().extend_pairs(pairs).append_pair("fmt", "json3");

    Ok(url)
}

/// Decode a `json3` timed text body into fragments
fn parse_timed_text(body: &str) -> Result<Vec<TranscriptFragment>, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::NoTranscript("caption track is empty".to_string()));
    }

    let timed_text: TimedText = serde_json::from_str(body)
        .map_err(|e| FetchError::ProviderUnavailable(format!("unreadable caption track: {}", e)))?;

    let fragments = timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text: String = segs.into_iter().map(|seg| seg.utf8).collect();
            Some(TranscriptFragment::new(
                text,
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
            ))
        })
        .collect();

    Ok(fragments)
}
