use anyhow::Result;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;

/// Result of a one-off command, keyed like the HTTP response body
#[derive(Debug, Clone, Copy)]
pub enum ResultField {
    Summary,
    Answer,
    TranslatedText,
}

impl ResultField {
    pub fn key(&self) -> &'static str {
        match self {
            ResultField::Summary => "summary",
            ResultField::Answer => "answer",
            ResultField::TranslatedText => "translated_text",
        }
    }
}

/// Render a command result in the requested format
pub fn format_result(field: ResultField, text: &str, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => text.to_string(),
        OutputFormat::Json => {
            let mut body = Map::new();
            body.insert(field.key().to_string(), Value::String(text.to_string()));
            serde_json::to_string_pretty(&body)?
        }
    };

    Ok(content)
}

/// Print a command result to the console
pub fn print_to_console(field: ResultField, text: &str, format: &OutputFormat) -> Result<()> {
    println!("{}", format_result(field, text, format)?);
    Ok(())
}
