//! HTTP boundary for the triage pipeline.
//!
//! A single route, `POST /api/analyze`, plus an OPTIONS preflight and a
//! JSON 405 for anything else. Permissive CORS on every response. The
//! handler is thin: deserialize, run the orchestrator, map the outcome
//! or the stage failure to the wire format. Errors are logged with
//! their full cause chain before surfacing; the chain is only included
//! in the response body when explicitly enabled.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::core::RequestOrchestrator;
use crate::domain::{AnalysisProfile, TaskAnalysis, TaskRequest};

/// Shared application state, created once at startup
pub struct AppState {
    pub orchestrator: RequestOrchestrator,
    /// Include the error cause chain in 500 bodies (off by default;
    /// diagnostics normally stay in the logs)
    pub expose_error_chain: bool,
}

/// Success response body
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,

    /// Canonical text under the extended profile's key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,

    /// Canonical text under the basic profile's key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    pub analysis: TaskAnalysis,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/analyze",
            post(analyze)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the HTTP server
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> Response {
    match state.orchestrator.handle(&request).await {
        Ok(outcome) => {
            let (transcription, text) = match state.orchestrator.profile() {
                AnalysisProfile::Extended => (Some(outcome.input.text.clone()), None),
                AnalysisProfile::Basic => (None, Some(outcome.input.text.clone())),
            };

            Json(AnalyzeResponse {
                success: true,
                transcription,
                text,
                analysis: outcome.analysis,
            })
            .into_response()
        }
        Err(err) => {
            let chain = error_chain(&err);
            error!(status = err.status_code(), %chain, "Pipeline failed");

            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = ErrorResponse {
                error: err.to_string(),
                stack: state.expose_error_chain.then_some(chain),
            };
            (status, Json(body)).into_response()
        }
    }
}

/// CORS preflight; headers come from the CORS layer
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
            stack: None,
        }),
    )
        .into_response()
}

/// Flatten an error and its sources into one line-per-cause string
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(&format!("\ncaused by: {}", cause));
        source = cause.source();
    }
    chain
}
