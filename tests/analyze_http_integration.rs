//! Integration tests for the analysis HTTP endpoint.
//!
//! These tests drive the full router with `tower::ServiceExt::oneshot`:
//! 1. `POST /api/analyze` success and every error status
//! 2. CORS preflight and headers on every response
//! 3. Static front-end serving and the health endpoint

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use idss_analyst::adapters::ai::MockCompletionClient;
use idss_analyst::adapters::http::{build_router, AnalysisAppState};
use idss_analyst::application::AnalyzeHandler;
use idss_analyst::ports::SafetyRating;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(handler: AnalyzeHandler) -> (Router, TempDir) {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        static_dir.path().join("index.html"),
        "<!doctype html><title>IDSS</title>",
    )
    .unwrap();
    std::fs::create_dir(static_dir.path().join("assets")).unwrap();
    std::fs::write(static_dir.path().join("assets/app.js"), "console.log('idss');").unwrap();

    let router = build_router(AnalysisAppState::new(handler), static_dir.path());
    (router, static_dir)
}

fn app_with_mock(mock: &MockCompletionClient) -> (Router, TempDir) {
    app_with(AnalyzeHandler::new(Arc::new(mock.clone())))
}

fn post_analyze(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_cors_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

fn indicator_request() -> String {
    json!({
        "type": "indicator_yearly_consolidated",
        "operatorSize": "Grande Porte",
        "activeReferenceYear": 2024,
        "indicatorData": {
            "indicatorName": "Taxa de Sessões de Hemodiálise",
            "targetDirection": "down",
            "currentValue": 3.2,
            "notaFinal": 0.82,
            "isRate": true
        }
    })
    .to_string()
}

// =============================================================================
// POST /api/analyze
// =============================================================================

#[tokio::test]
async fn valid_request_returns_analysis() {
    let mock = MockCompletionClient::new().with_success("Resultado consistente com a meta.");
    let (app, _dir) = app_with_mock(&mock);

    let response = app.oneshot(post_analyze(indicator_request())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_cors_headers(&response);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "analysis": "Resultado consistente com a meta." }));

    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("Taxa de Sessões de Hemodiálise"));
    assert!(prompt.contains("Resultado Anual Consolidado (2024): 3.20%"));
}

#[tokio::test]
async fn every_analysis_type_is_accepted() {
    let bodies = [
        json!({ "type": "indicator_last_period", "indicatorData": { "indicatorName": "A" } }),
        json!({ "type": "indicator_yearly_comparison", "indicatorData": { "indicatorName": "A" } }),
        json!({ "type": "dimension", "dimensionData": { "name": "IDQS" } }),
        json!({ "type": "idss", "idssData": { "notaFinalCalculada": 0.7 } }),
        json!({ "type": "overall_indicators", "overallIndicatorsData": [{ "name": "A" }] }),
    ];
    let mock = MockCompletionClient::new();

    for body in bodies {
        let (app, _dir) = app_with_mock(&mock);
        let response = app.oneshot(post_analyze(body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{body}");
        assert!(!json_body(response).await["analysis"]
            .as_str()
            .unwrap()
            .is_empty());
    }
    assert_eq!(mock.call_count(), 5);
}

#[tokio::test]
async fn missing_credential_returns_configuration_error() {
    let (app, _dir) = app_with(AnalyzeHandler::unconfigured());

    let response = app.oneshot(post_analyze(indicator_request())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("não configurada"));
}

#[tokio::test]
async fn unknown_type_returns_bad_request() {
    let mock = MockCompletionClient::new();
    let (app, _dir) = app_with_mock(&mock);

    let response = app
        .oneshot(post_analyze(r#"{"type":"bogus"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("bogus"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn missing_payload_returns_bad_request() {
    let mock = MockCompletionClient::new();
    let (app, _dir) = app_with_mock(&mock);

    let response = app
        .oneshot(post_analyze(r#"{"type":"dimension"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Dados da dimensão"));
}

#[tokio::test]
async fn malformed_json_returns_bad_request() {
    let mock = MockCompletionClient::new();
    let (app, _dir) = app_with_mock(&mock);

    let response = app.oneshot(post_analyze("{\"type\": ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Corpo da requisição JSON inválido.");
}

#[tokio::test]
async fn safety_block_returns_bad_request_with_reason() {
    let mock = MockCompletionClient::new().with_blocked(
        "Bloqueado: SAFETY",
        vec![SafetyRating::new("HARM_CATEGORY_HARASSMENT", "MEDIUM")],
    );
    let (app, _dir) = app_with_mock(&mock);

    let response = app.oneshot(post_analyze(indicator_request())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("SAFETY"));
    assert!(error.contains("HARM_CATEGORY_HARASSMENT: MEDIUM"));
}

#[tokio::test]
async fn upstream_failure_returns_server_error() {
    let mock = MockCompletionClient::new().with_error("HTTP 429: quota exceeded");
    let (app, _dir) = app_with_mock(&mock);

    let response = app.oneshot(post_analyze(indicator_request())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Erro na API do Gemini: HTTP 429: quota exceeded");
}

#[tokio::test]
async fn get_on_analyze_returns_method_not_allowed() {
    let (app, _dir) = app_with(AnalyzeHandler::unconfigured());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/analyze")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors_headers(&response);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Método não permitido. Use POST.");
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn options_preflight_returns_no_content() {
    let mock = MockCompletionClient::new();
    let (app, _dir) = app_with_mock(&mock);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/analyze")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors_headers(&response);
    assert!(text_body(response).await.is_empty());
    assert_eq!(mock.call_count(), 0);
}

// =============================================================================
// Static files and health
// =============================================================================

#[tokio::test]
async fn root_serves_index_html() {
    let (app, _dir) = app_with(AnalyzeHandler::unconfigured());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert!(text_body(response).await.contains("<title>IDSS</title>"));
}

#[tokio::test]
async fn nested_asset_is_served() {
    let (app, _dir) = app_with(AnalyzeHandler::unconfigured());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/assets/app.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "console.log('idss');");
}

#[tokio::test]
async fn missing_asset_is_not_found() {
    let (app, _dir) = app_with(AnalyzeHandler::unconfigured());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _dir) = app_with(AnalyzeHandler::unconfigured());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}
