//! Analysis request payloads as sent by the IDSS front-end.
//!
//! The wire shape is deliberately loose: every field is optional and numeric
//! fields accept any JSON value. [`AnalysisRequest::resolve`] turns it into a
//! typed [`Analysis`] once the `type` field and its payload are known to be
//! present.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{AnalysisType, PromptError};

/// Operator size used when the request doesn't say.
pub const DEFAULT_OPERATOR_SIZE: &str = "Não especificado";

/// Incoming analysis request (camelCase JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Raw analysis type; validated by [`AnalysisRequest::resolve`].
    #[serde(rename = "type")]
    pub analysis_type: Option<String>,
    /// Operator size ("Pequeno Porte", "Médio Porte", "Grande Porte").
    pub operator_size: Option<String>,
    /// Year the data refers to.
    pub active_reference_year: Option<i32>,
    pub indicator_data: Option<IndicatorData>,
    pub dimension_data: Option<DimensionData>,
    pub idss_data: Option<IdssData>,
    pub overall_indicators_data: Option<Vec<IndicatorSummary>>,
}

/// A request whose type is known and whose required payload is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Analysis<'a> {
    IndicatorLastPeriod(&'a IndicatorData),
    IndicatorYearlyConsolidated(&'a IndicatorData),
    IndicatorYearlyComparison(&'a IndicatorData),
    Dimension(&'a DimensionData),
    Idss(&'a IdssData),
    OverallIndicators(&'a [IndicatorSummary]),
}

impl Analysis<'_> {
    /// Returns the analysis type of this variant.
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            Analysis::IndicatorLastPeriod(_) => AnalysisType::IndicatorLastPeriod,
            Analysis::IndicatorYearlyConsolidated(_) => AnalysisType::IndicatorYearlyConsolidated,
            Analysis::IndicatorYearlyComparison(_) => AnalysisType::IndicatorYearlyComparison,
            Analysis::Dimension(_) => AnalysisType::Dimension,
            Analysis::Idss(_) => AnalysisType::Idss,
            Analysis::OverallIndicators(_) => AnalysisType::OverallIndicators,
        }
    }
}

impl AnalysisRequest {
    /// Validates the type field and selects the payload it requires.
    ///
    /// # Errors
    ///
    /// - `InvalidAnalysisType` if `type` is absent or unknown
    /// - `MissingData` if the required payload is absent or empty
    pub fn resolve(&self) -> Result<Analysis<'_>, PromptError> {
        let raw = self.analysis_type.as_deref();
        let analysis_type: AnalysisType = raw
            .ok_or_else(|| PromptError::invalid_type(None))?
            .parse()
            .map_err(|_| PromptError::invalid_type(raw))?;

        let missing = || PromptError::missing_data(analysis_type);

        let indicator = || {
            self.indicator_data
                .as_ref()
                .filter(|data| !data.is_empty())
                .ok_or_else(missing)
        };

        let analysis = match analysis_type {
            AnalysisType::IndicatorLastPeriod => Analysis::IndicatorLastPeriod(indicator()?),
            AnalysisType::IndicatorYearlyConsolidated => {
                Analysis::IndicatorYearlyConsolidated(indicator()?)
            }
            AnalysisType::IndicatorYearlyComparison => {
                Analysis::IndicatorYearlyComparison(indicator()?)
            }
            AnalysisType::Dimension => Analysis::Dimension(
                self.dimension_data
                    .as_ref()
                    .filter(|data| !data.is_empty())
                    .ok_or_else(missing)?,
            ),
            AnalysisType::Idss => Analysis::Idss(
                self.idss_data
                    .as_ref()
                    .filter(|data| !data.is_empty())
                    .ok_or_else(missing)?,
            ),
            AnalysisType::OverallIndicators => Analysis::OverallIndicators(
                self.overall_indicators_data
                    .as_deref()
                    .filter(|list| !list.is_empty())
                    .ok_or_else(missing)?,
            ),
        };

        Ok(analysis)
    }

    /// Operator size, or [`DEFAULT_OPERATOR_SIZE`].
    pub fn operator_size(&self) -> &str {
        self.operator_size
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_OPERATOR_SIZE)
    }

    /// Reference year, or `fallback` when the request doesn't carry one.
    pub fn reference_year_or(&self, fallback: i32) -> i32 {
        self.active_reference_year.unwrap_or(fallback)
    }
}

/// Direction in which an indicator improves.
///
/// Values other than `up`, `down` and `none` are kept as sent and printed back
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum TargetDirection {
    /// Higher is better.
    Up,
    /// Lower is better.
    Down,
    /// No preferred direction.
    None,
    Other(String),
}

impl From<Value> for TargetDirection {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => match s.as_str() {
                "up" => TargetDirection::Up,
                "down" => TargetDirection::Down,
                "none" => TargetDirection::None,
                _ => TargetDirection::Other(s),
            },
            other => TargetDirection::Other(other.to_string()),
        }
    }
}

impl From<TargetDirection> for String {
    fn from(direction: TargetDirection) -> Self {
        direction.to_string()
    }
}

impl fmt::Display for TargetDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetDirection::Up => "up",
            TargetDirection::Down => "down",
            TargetDirection::None => "none",
            TargetDirection::Other(raw) => raw,
        };
        f.write_str(s)
    }
}

/// Snapshot of one indicator for the single-indicator analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorData {
    pub indicator_name: Option<String>,
    pub simple_name: Option<String>,
    pub description: Option<String>,
    pub responsible_sector: Option<String>,
    pub target_description: Option<String>,
    pub target_direction: Option<TargetDirection>,
    /// Result of the latest period, or the consolidated yearly result.
    pub current_value: Option<Value>,
    /// Consolidated yearly result, when sent separately from `current_value`.
    pub consolidated_value: Option<Value>,
    pub previous_year_value: Option<Value>,
    pub nota_final: Option<Value>,
    pub is_rate: Option<bool>,
    pub current_period_label: Option<String>,
}

impl IndicatorData {
    /// Returns true if no field was sent.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Full name, falling back to the short name.
    pub fn display_name(&self) -> Option<&str> {
        self.indicator_name
            .as_deref()
            .or(self.simple_name.as_deref())
    }

    /// Whether values are percentages.
    pub fn is_rate(&self) -> bool {
        self.is_rate.unwrap_or(false)
    }

    /// Consolidated yearly result (`consolidatedValue`, else `currentValue`).
    pub fn yearly_value(&self) -> Option<&Value> {
        self.consolidated_value
            .as_ref()
            .filter(|v| !v.is_null())
            .or(self.current_value.as_ref())
    }
}

/// One year of results for an indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyResult {
    pub year: Option<i32>,
    pub consolidated_value: Option<Value>,
    pub nota_final: Option<Value>,
}

/// Looks up the result recorded for `year`.
pub fn result_for_year(results: &[YearlyResult], year: i32) -> Option<&YearlyResult> {
    results.iter().find(|r| r.year == Some(year))
}

/// Indicator as listed inside a dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionIndicator {
    pub id: Option<String>,
    pub name: Option<String>,
    pub simple_name: Option<String>,
    pub is_rate: Option<bool>,
    #[serde(default)]
    pub results: Vec<YearlyResult>,
}

impl DimensionIndicator {
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.simple_name.as_deref())
    }

    pub fn result_for_year(&self, year: i32) -> Option<&YearlyResult> {
        result_for_year(&self.results, year)
    }
}

/// An IDSS dimension with its computed score and indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub nota_final_calculada: Option<Value>,
    #[serde(rename = "weightInIDSS")]
    pub weight_in_idss: Option<Value>,
    #[serde(default)]
    pub indicators: Vec<DimensionIndicator>,
}

impl DimensionData {
    /// Returns true if no field was sent.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Official IDSS score published for a past program year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalIdssScore {
    pub program_year: Option<i32>,
    pub base_year: Option<i32>,
    pub score: Option<Value>,
    pub source: Option<String>,
}

/// The global IDSS picture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdssData {
    pub nota_final_calculada: Option<Value>,
    #[serde(default)]
    pub dimensions: Vec<DimensionData>,
    pub historical_idss_scores: Option<Vec<HistoricalIdssScore>>,
}

impl IdssData {
    /// Returns true if no field was sent.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Historical scores, newest program year first. Ties keep input order.
    pub fn historical_scores_newest_first(&self) -> Vec<&HistoricalIdssScore> {
        let mut scores: Vec<&HistoricalIdssScore> = self
            .historical_idss_scores
            .iter()
            .flatten()
            .collect();
        scores.sort_by(|a, b| {
            b.program_year
                .unwrap_or(0)
                .cmp(&a.program_year.unwrap_or(0))
        });
        scores
    }
}

/// Indicator entry for the overall analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub simple_name: Option<String>,
    pub dimension_id: Option<String>,
    pub weight_in_dimension: Option<Value>,
    /// 1 = high, 2 = medium, 3 = low relevance.
    pub idss_weight_level: Option<Value>,
    pub is_rate: Option<bool>,
    #[serde(default)]
    pub results: Vec<YearlyResult>,
}

impl IndicatorSummary {
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.simple_name.as_deref())
    }

    /// Level code; integral floats such as `1.0` count as their integer.
    pub fn weight_level_code(&self) -> Option<i64> {
        match self.idss_weight_level.as_ref()? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn result_for_year(&self, year: i32) -> Option<&YearlyResult> {
        result_for_year(&self.results, year)
    }
}
