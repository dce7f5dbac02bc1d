//! Analysis handlers.

mod analyze;
mod error;

pub use analyze::{AnalyzeCommand, AnalyzeHandler, AnalyzeResult};
pub use error::AnalysisError;
