//! Errors raised while turning a request into a prompt.

use thiserror::Error;

use super::AnalysisType;

/// Prompt construction failures. Both are caller mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// The `type` field was absent or named no known analysis.
    #[error("Tipo de análise inválido: {}", .0.as_deref().unwrap_or("(não informado)"))]
    InvalidAnalysisType(Option<String>),

    /// The payload required by the analysis type was absent or empty.
    #[error("{} ausentes para o tipo de análise {analysis_type}.", .analysis_type.payload_label())]
    MissingData { analysis_type: AnalysisType },
}

impl PromptError {
    /// Creates an invalid analysis type error.
    pub fn invalid_type(raw: Option<&str>) -> Self {
        PromptError::InvalidAnalysisType(raw.map(str::to_string))
    }

    /// Creates a missing data error for the given type.
    pub fn missing_data(analysis_type: AnalysisType) -> Self {
        PromptError::MissingData { analysis_type }
    }
}
