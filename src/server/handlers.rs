use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use super::types::*;
use crate::service::AssistantService;
use crate::utils::{format_duration, preview};
use crate::AssistantError;

type ApiResult<T> = Result<Json<T>, AssistantError>;

impl IntoResponse for AssistantError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AssistantError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AssistantError::MalformedInput(format!("Invalid request body: {}", rejection.body_text())))
}

/// Run a handler body inside a request span and log its outcome
async fn traced<T, F>(route: &'static str, work: F) -> ApiResult<T>
where
    F: std::future::Future<Output = Result<T, AssistantError>>,
{
    let span = tracing::info_span!("request", id = %Uuid::new_v4(), route);

    async move {
        let started = Instant::now();
        let result = work.await;
        let elapsed = format_duration(started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => tracing::info!("Responded 200 after {}", elapsed),
            Err(err) => tracing::warn!(
                "Responded 400 after {} ({}): {}",
                elapsed,
                err.kind().as_str(),
                err
            ),
        }

        result.map(Json)
    }
    .instrument(span)
    .await
}

pub async fn handle_summarize(
    Extension(service): Extension<Arc<AssistantService>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> ApiResult<SummaryResponse> {
    traced("summarize", async move {
        let req = parse_body(payload)?;
        let video_url = provided(req.video_url)
            .ok_or_else(|| AssistantError::MalformedInput("No video URL provided".to_string()))?;

        tracing::info!("Summarize requested for {}", video_url);
        let summary = service.summarize(&video_url).await?;

        Ok(SummaryResponse { summary })
    })
    .await
}

pub async fn handle_ask(
    Extension(service): Extension<Arc<AssistantService>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<AnswerResponse> {
    traced("ask", async move {
        let req = parse_body(payload)?;
        let (Some(video_url), Some(question)) = (provided(req.video_url), provided(req.question)) else {
            return Err(AssistantError::MalformedInput(
                "Video URL or question not provided".to_string(),
            ));
        };

        tracing::info!("Question about {}: {}", video_url, preview(&question, 80));
        let answer = service.ask(&video_url, &question).await?;

        Ok(AnswerResponse { answer })
    })
    .await
}

pub async fn handle_translate(
    Extension(service): Extension<Arc<AssistantService>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<TranslationResponse> {
    traced("translate", async move {
        let req = parse_body(payload)?;
        let text = provided(req.text).ok_or_else(|| {
            AssistantError::MalformedInput("No text provided for translation".to_string())
        })?;
        let target_language = provided(req.target_language);

        let translated_text = service.translate(&text, target_language.as_deref()).await?;

        Ok(TranslationResponse { translated_text })
    })
    .await
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
