//! IDSS analysis domain.
//!
//! Request payloads, value formatting and the prompt builder. Everything
//! here is pure: no I/O, no clocks except the default reference year.

mod analysis_type;
mod errors;
pub mod formatter;
pub mod prompt;
mod request;

pub use analysis_type::{AnalysisType, UnknownAnalysisType};
pub use errors::PromptError;
pub use formatter::{format_value, IdssWeightLevel, PerformanceStatus};
pub use prompt::{build_prompt, build_prompt_with_default_year, Prompt};
pub use request::{
    result_for_year, Analysis, AnalysisRequest, DimensionData, DimensionIndicator,
    HistoricalIdssScore, IdssData, IndicatorData, IndicatorSummary, TargetDirection,
    YearlyResult, DEFAULT_OPERATOR_SIZE,
};
