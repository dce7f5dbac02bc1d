//! HTTP adapters - REST API implementation.

pub mod analysis;
pub mod middleware;
mod router;

pub use analysis::{analysis_routes, AnalysisAppState};
pub use router::build_router;
