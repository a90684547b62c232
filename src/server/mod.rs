//! HTTP surface of the assistant.
//!
//! Three JSON endpoints (`/summarize`, `/ask`, `/translate`) plus `/health`. Every
//! failure is answered with HTTP 400 and an `{"error": ...}` body; the error kind is
//! only visible in the logs.

use anyhow::Context;
use axum::routing::{get, post};
use axum::{Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

use crate::service::AssistantService;
use handlers::{handle_ask, handle_health, handle_summarize, handle_translate};

/// Build the application router around a shared service
pub fn router(service: Arc<AssistantService>) -> Router {
    Router::new()
        .route("/summarize", post(handle_summarize))
        .route("/ask", post(handle_ask))
        .route("/translate", post(handle_translate))
        .route("/health", get(handle_health))
        .layer(Extension(service))
}

/// Serve until Ctrl+C is received
pub async fn serve(service: Arc<AssistantService>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("HTTP server listening on {}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining requests");
}
