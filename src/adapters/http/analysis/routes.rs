//! HTTP routes for the analysis endpoint.

use axum::routing::{any, get};
use axum::Router;

use super::handlers::{analyze, health, AnalysisAppState};

/// Path of the analysis endpoint.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Creates the analysis router.
pub fn analysis_routes(state: AnalysisAppState) -> Router {
    Router::new()
        // ANY /api/analyze (non-POST answered with 405 by the handler)
        .route(ANALYZE_PATH, any(analyze))
        // GET /health
        .route("/health", get(health))
        .with_state(state)
}
