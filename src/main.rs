use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transcript_assistant::output::{self, ResultField};
use transcript_assistant::{server, AssistantService, Cli, Commands, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);

    let mut config = Config::load().await?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let addr = config.bind_addr()?;

            // Clients are created once here and shared by every request
            let service = Arc::new(AssistantService::from_config(&config)?);

            tracing::info!("Starting transcript assistant on {}", addr);
            server::serve(service, addr).await?;
        }
        Commands::Summarize { video_url } => {
            let service = AssistantService::from_config(&config)?;

            let summary = with_spinner(cli.quiet, "Summarizing transcript...", service.summarize(&video_url)).await?;
            output::print_to_console(ResultField::Summary, &summary, &cli.format)?;
        }
        Commands::Ask { video_url, question } => {
            let service = AssistantService::from_config(&config)?;

            let answer = with_spinner(cli.quiet, "Answering question...", service.ask(&video_url, &question)).await?;
            output::print_to_console(ResultField::Answer, &answer, &cli.format)?;
        }
        Commands::Translate { text, to } => {
            let service = AssistantService::from_config(&config)?;

            let translated = with_spinner(cli.quiet, "Translating...", service.translate(&text, to.as_deref())).await?;
            output::print_to_console(ResultField::TranslatedText, &translated, &cli.format)?;
        }
        Commands::Config { show, init } => {
            if init {
                let path = config.save().await?;
                println!("Configuration written to: {}", path.display());
            }
            if show || !init {
                config.display();
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, json_logs: bool) {
    let default_directive = if verbose {
        "transcript_assistant=debug"
    } else {
        "transcript_assistant=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so one-off command output stays clean on stdout
    if json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn with_spinner<T>(quiet: bool, message: &'static str, work: impl Future<Output = T>) -> T {
    if quiet {
        return work.await;
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));

    let result = work.await;

    progress.finish_and_clear();
    result
}
