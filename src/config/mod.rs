use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::generation::{GenerationError, ProviderKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Transcript provider settings
    pub transcript: TranscriptConfig,

    /// Text generation service settings
    pub generation: GenerationConfig,

    /// Pipeline behaviour
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Watch page URL; the video id is appended as the `v` query parameter
    pub watch_url: String,

    /// Preferred caption languages, most preferred first
    pub languages: Vec<String>,

    /// Timeout for each request to the transcript provider
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Which generation API to talk to
    pub provider: ProviderKind,

    /// Base URL of the generation API
    pub api_base: String,

    /// Model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,

    /// Timeout for each generation request
    pub timeout_secs: u64,

    /// Retries for transient failures (timeouts, HTTP 429 and 5xx)
    pub max_retries: u32,

    /// Base delay between retries, multiplied by the attempt number
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Transcripts with fewer words are not summarized
    pub min_words: usize,

    /// Translation target when a request does not name one
    pub default_target_language: String,

    /// Summarize in windows of this many tokens instead of the whole transcript at once
    pub window_tokens: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            watch_url: "https://www.youtube.com/watch".to_string(),
            languages: vec!["en".to_string()],
            timeout_secs: 20,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_words: 30,
            default_target_language: "Hindi".to_string(),
            window_tokens: None,
        }
    }
}

impl GenerationConfig {
    /// Resolve the API key from the config or the configured environment variable
    pub fn resolve_api_key(&self) -> std::result::Result<String, GenerationError> {
        if let Some(key) = self.api_key.as_ref().filter(|key| !key.trim().is_empty()) {
            return Ok(key.clone());
        }

        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey(self.api_key_env.clone()))
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            tracing::debug!("Loading configuration from {}", config_path.display());
            Self::from_file(&config_path)?
        } else {
            tracing::debug!("No configuration file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-assistant").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.transcript.timeout_secs == 0 || self.generation.timeout_secs == 0 {
            anyhow::bail!("Timeouts must be greater than zero seconds");
        }

        if self.transcript.languages.is_empty() {
            anyhow::bail!("At least one transcript language must be configured");
        }

        if self.generation.model.trim().is_empty() {
            anyhow::bail!("A generation model must be configured");
        }

        if self.pipeline.min_words == 0 {
            anyhow::bail!("pipeline.min_words must be at least 1");
        }

        if self.pipeline.window_tokens == Some(0) {
            anyhow::bail!("pipeline.window_tokens must be at least 1 when set");
        }

        Ok(())
    }

    /// Parsed server bind address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.server.bind))
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Bind Address: {}", self.server.bind);
        println!("  Transcript Languages: {}", self.transcript.languages.join(", "));
        println!("  Transcript Timeout: {}s", self.transcript.timeout_secs);
        println!("  Generation Provider: {}", self.generation.provider.name());
        println!("  Generation Model: {}", self.generation.model);
        println!("  Generation API: {}", self.generation.api_base);
        println!(
            "  API Key: {}",
            if self.generation.resolve_api_key().is_ok() { "configured" } else { "missing" }
        );
        println!("  Generation Timeout: {}s (retries: {})", self.generation.timeout_secs, self.generation.max_retries);
        println!("  Minimum Words: {}", self.pipeline.min_words);
        println!("  Default Target Language: {}", self.pipeline.default_target_language);
        match self.pipeline.window_tokens {
            Some(size) => println!("  Summary Windows: {} tokens", size),
            None => println!("  Summary Windows: disabled"),
        }
    }
}
