//! Top-level router: API routes, static front-end and cross-cutting layers.

use std::any::Any;
use std::path::Path;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::analysis::{analysis_routes, AnalysisAppState};
use super::middleware::cors_middleware;
use crate::application::AnalysisError;

/// Builds the application router.
///
/// Unmatched paths fall through to the static asset tree rooted at
/// `static_dir`; directory requests are served their `index.html`.
/// Layers run outermost first: tracing, CORS, panic recovery.
pub fn build_router(state: AnalysisAppState, static_dir: impl AsRef<Path>) -> Router {
    let static_files = ServeDir::new(static_dir.as_ref()).append_index_html_on_directories(true);

    Router::new()
        .merge(analysis_routes(state))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &Request<Body>| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            version = ?request.version(),
                        )
                    },
                ))
                .layer(from_fn(cors_middleware))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("panic");
    tracing::error!(panic = %detail, "Request handler panicked");
    AnalysisError::Internal(detail.to_string()).into_response()
}
