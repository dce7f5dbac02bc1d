//! Application handlers.
//!
//! Command handlers that orchestrate domain operations and ports.

pub mod analysis;

pub use analysis::{AnalysisError, AnalyzeCommand, AnalyzeHandler, AnalyzeResult};
