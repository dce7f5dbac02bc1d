//! The closed set of analysis kinds a caller can request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of analysis requested, selected by the request's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Latest period result of a single indicator.
    IndicatorLastPeriod,
    /// Consolidated yearly result and final score of a single indicator.
    IndicatorYearlyConsolidated,
    /// Reference year versus previous year for a single indicator.
    IndicatorYearlyComparison,
    /// One IDSS dimension and its indicators.
    Dimension,
    /// The global IDSS score and its dimensions.
    Idss,
    /// Every indicator of the operator at once.
    OverallIndicators,
}

impl AnalysisType {
    /// All analysis types, in declaration order.
    pub const ALL: [AnalysisType; 6] = [
        AnalysisType::IndicatorLastPeriod,
        AnalysisType::IndicatorYearlyConsolidated,
        AnalysisType::IndicatorYearlyComparison,
        AnalysisType::Dimension,
        AnalysisType::Idss,
        AnalysisType::OverallIndicators,
    ];

    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::IndicatorLastPeriod => "indicator_last_period",
            AnalysisType::IndicatorYearlyConsolidated => "indicator_yearly_consolidated",
            AnalysisType::IndicatorYearlyComparison => "indicator_yearly_comparison",
            AnalysisType::Dimension => "dimension",
            AnalysisType::Idss => "idss",
            AnalysisType::OverallIndicators => "overall_indicators",
        }
    }

    /// Human label of the payload this type requires, used in error messages.
    pub fn payload_label(&self) -> &'static str {
        match self {
            AnalysisType::IndicatorLastPeriod
            | AnalysisType::IndicatorYearlyConsolidated
            | AnalysisType::IndicatorYearlyComparison => "Dados do indicador",
            AnalysisType::Dimension => "Dados da dimensão",
            AnalysisType::Idss => "Dados do IDSS",
            AnalysisType::OverallIndicators => "Dados de indicadores",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known analysis type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnalysisType(pub String);

impl FromStr for AnalysisType {
    type Err = UnknownAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAnalysisType(s.to_string()))
    }
}
