//! JSON API over the triage pipeline.
//!
//! `POST /api/ask {"symptoms": "...", "skip_reasoner": false}` runs one
//! request through the pipeline; `GET /health` answers once warm-up has
//! finished. Warm-up happens before the listener binds, so a failing
//! collaborator is a startup error, never a half-alive server.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use triage_core::config::TriageConfig;
use triage_core::error::Error;
use triage_pipeline::Pipeline;

#[derive(Deserialize)]
struct AskRequest {
    symptoms: String,
    #[serde(default)]
    skip_reasoner: bool,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

fn error_response(err: &Error) -> Response {
    let (status, kind) = match err {
        Error::EmptyInput => (StatusCode::BAD_REQUEST, "empty_input"),
        Error::DependencyUnavailable { .. } => (StatusCode::BAD_GATEWAY, "dependency_unavailable"),
        Error::InvalidConfig(_) => (StatusCode::INTERNAL_SERVER_ERROR, "invalid_config"),
        Error::Corpus(_) => (StatusCode::INTERNAL_SERVER_ERROR, "corpus"),
    };
    (status, Json(json!({"error": kind, "detail": err.to_string()}))).into_response()
}

async fn api_ask(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<AskRequest>,
) -> Response {
    let symptoms = request.symptoms.trim().to_string();
    if symptoms.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "empty_input", "detail": "symptoms required"})),
        )
            .into_response();
    }

    // The pipeline is synchronous blocking; keep it off the async workers.
    let result =
        tokio::task::spawn_blocking(move || pipeline.ask(&symptoms, request.skip_reasoner)).await;

    match result {
        Ok(Ok(response)) => Json(response).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "request failed");
            error_response(&e)
        }
        Err(e) => {
            error!(error = %e, "pipeline task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal", "detail": "pipeline task failed"})),
            )
                .into_response()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = TriageConfig::load()?;
    // Warm up outside the async runtime: the index handle owns its own
    // runtime and must not be built from within one.
    let pipeline = Arc::new(Pipeline::warm_up(&config)?);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/ask", post(api_ask))
        .with_state(pipeline);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(%addr, "triage server listening");
        axum::serve(listener, app).await?;
        Ok::<_, anyhow::Error>(())
    })
}
