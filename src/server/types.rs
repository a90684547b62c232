use serde::{Deserialize, Serialize};

// Fields are optional so missing values reach validation instead of failing deserialization.

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    pub video_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    pub video_url: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translated_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Treat absent, empty and whitespace-only fields alike
pub fn provided(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}
