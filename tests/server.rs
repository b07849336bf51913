//! HTTP Boundary Tests
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`,
//! asserting status codes, body shapes, and CORS headers for the
//! contract cases: 200, 400, 405, 500, and the preflight.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tasktriage::adapters::{
    DispatchError, Dispatcher, GenerationError, Generator, Transcriber, TranscriptionError,
};
use tasktriage::server::{router, AppState};
use tasktriage::{AnalysisProfile, RequestOrchestrator};

const VALID_REPLY: &str = r#"{"priority":5,"isParetoTask":true,"firstStep":"Otevřít dokument","timeEstimate":"30 min","category":"práce","analysis":"Klíčový výstup týdne","actionPlan":["a","b"]}"#;

struct StubTranscriber;

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _language: &str,
    ) -> Result<String, TranscriptionError> {
        Ok("přepsaný text".to_string())
    }
}

struct StubGenerator {
    reply: Result<String, GenerationError>,
    calls: Mutex<usize>,
}

impl StubGenerator {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(GenerationError::Upstream("HTTP 503 from generation API".to_string())),
            calls: Mutex::new(0),
        })
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, GenerationError> {
        *self.calls.lock().unwrap() += 1;
        self.reply.clone()
    }
}

struct StubDispatcher {
    calls: Mutex<usize>,
}

impl StubDispatcher {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(0),
        })
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Dispatcher for StubDispatcher {
    async fn dispatch(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), DispatchError> {
        *self.calls.lock().unwrap() += 1;
        Ok(())
    }
}

fn app(
    generator: Arc<StubGenerator>,
    dispatcher: Arc<StubDispatcher>,
    profile: AnalysisProfile,
    expose_error_chain: bool,
) -> axum::Router {
    let orchestrator = RequestOrchestrator::new(
        Arc::new(StubTranscriber),
        generator,
        dispatcher,
        profile,
        0.3,
    );

    router(Arc::new(AppState {
        orchestrator,
        expose_error_chain,
    }))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json")
        .header("origin", "http://localhost:3000")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_empty_body_returns_400_without_collaborator_calls() {
    let generator = StubGenerator::replying(VALID_REPLY);
    let dispatcher = StubDispatcher::new();
    let app = app(
        generator.clone(),
        dispatcher.clone(),
        AnalysisProfile::Extended,
        false,
    );

    let response = app.oneshot(post_json("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(!json["error"].as_str().unwrap().is_empty());

    assert_eq!(generator.call_count(), 0);
    assert_eq!(dispatcher.call_count(), 0);
}

#[tokio::test]
async fn test_text_request_returns_success_envelope() {
    let app = app(
        StubGenerator::replying(VALID_REPLY),
        StubDispatcher::new(),
        AnalysisProfile::Extended,
        false,
    );

    let response = app
        .oneshot(post_json(r#"{"text":"napsat report"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    // Extended profile reports the canonical text under "transcription"
    assert_eq!(json["transcription"], "napsat report");
    assert!(json.get("text").is_none());
    assert_eq!(json["analysis"]["priority"], 5);
    assert_eq!(json["analysis"]["actionPlan"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_basic_profile_reports_text_key() {
    let app = app(
        StubGenerator::replying(VALID_REPLY),
        StubDispatcher::new(),
        AnalysisProfile::Basic,
        false,
    );

    let response = app
        .oneshot(post_json(r#"{"text":"napsat report"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["text"], "napsat report");
    assert!(json.get("transcription").is_none());
}

#[tokio::test]
async fn test_unsupported_method_returns_405_with_json_body() {
    let app = app(
        StubGenerator::replying(VALID_REPLY),
        StubDispatcher::new(),
        AnalysisProfile::Extended,
        false,
    );

    let request = Request::builder()
        .method("GET")
        .uri("/api/analyze")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Method not allowed");
}

#[tokio::test]
async fn test_options_returns_success_with_empty_body() {
    let app = app(
        StubGenerator::replying(VALID_REPLY),
        StubDispatcher::new(),
        AnalysisProfile::Extended,
        false,
    );

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/analyze")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_pipeline_failure_returns_500_without_stack_by_default() {
    let app = app(
        StubGenerator::failing(),
        StubDispatcher::new(),
        AnalysisProfile::Extended,
        false,
    );

    let response = app
        .oneshot(post_json(r#"{"text":"napsat report"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert!(json.get("stack").is_none());
}

#[tokio::test]
async fn test_error_chain_exposed_only_when_enabled() {
    let app = app(
        StubGenerator::failing(),
        StubDispatcher::new(),
        AnalysisProfile::Extended,
        true,
    );

    let response = app
        .oneshot(post_json(r#"{"text":"napsat report"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["stack"].as_str().unwrap().contains("caused by"));
}

#[tokio::test]
async fn test_dispatcher_untouched_when_no_email() {
    let dispatcher = StubDispatcher::new();
    let app = app(
        StubGenerator::replying(VALID_REPLY),
        dispatcher.clone(),
        AnalysisProfile::Extended,
        false,
    );

    let response = app
        .oneshot(post_json(r#"{"text":"napsat report"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(dispatcher.call_count(), 0);
}
