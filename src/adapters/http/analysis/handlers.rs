//! HTTP handlers for the analysis endpoint.
//!
//! These handlers connect Axum routes to the application layer handler.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};

use crate::application::{AnalysisError, AnalyzeCommand, AnalyzeHandler};

use super::dto::{AnalysisResponse, ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.user_message()))).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for the analysis endpoint.
#[derive(Clone)]
pub struct AnalysisAppState {
    pub handler: AnalyzeHandler,
}

impl AnalysisAppState {
    pub fn new(handler: AnalyzeHandler) -> Self {
        Self { handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// ANY /api/analyze
///
/// Only POST is accepted; the handler itself answers other methods with 405
/// so the error body stays JSON.
pub async fn analyze(
    State(state): State<AnalysisAppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, AnalysisError> {
    let result = state
        .handler
        .handle(AnalyzeCommand::new(method, body.to_vec()))
        .await?;

    Ok(Json(AnalysisResponse {
        analysis: result.analysis,
    }))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
