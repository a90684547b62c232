use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "transcript-assistant",
    about = "Transcript Assistant - Summarize, question and translate YouTube videos with a generative text API",
    version,
    long_about = "Fetches the caption transcript of a YouTube video and forwards it to a text generation service. Runs as a JSON HTTP server (summarize, ask, translate) or answers one-off requests from the command line."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for one-off commands
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides server.bind from the config file)
        #[arg(short, long, value_name = "ADDR", env = "TRANSCRIPT_ASSISTANT_BIND")]
        bind: Option<String>,
    },

    /// Summarize the transcript of a video
    Summarize {
        /// Video URL containing a `v=` parameter
        #[arg(value_name = "VIDEO_URL", value_parser = NonEmptyStringValueParser::new())]
        video_url: String,
    },

    /// Ask a question about a video
    Ask {
        /// Video URL containing a `v=` parameter
        #[arg(value_name = "VIDEO_URL", value_parser = NonEmptyStringValueParser::new())]
        video_url: String,

        /// Question to answer from the transcript
        #[arg(value_name = "QUESTION", value_parser = NonEmptyStringValueParser::new())]
        question: String,
    },

    /// Translate text
    Translate {
        /// Text to translate
        #[arg(value_name = "TEXT", value_parser = NonEmptyStringValueParser::new())]
        text: String,

        /// Target language name or code (defaults to pipeline.default_target_language)
        #[arg(short, long, value_name = "LANG")]
        to: Option<String>,
    },

    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON object shaped like the HTTP response
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
