//! Analysis HTTP adapter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{AnalysisResponse, ErrorResponse, HealthResponse};
pub use handlers::AnalysisAppState;
pub use routes::{analysis_routes, ANALYZE_PATH};
