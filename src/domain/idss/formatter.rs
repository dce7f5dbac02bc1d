//! Display formatting for indicator values, weights and scores.
//!
//! Request values arrive as loosely typed JSON: numbers, numeric strings,
//! free text or null. Every function here is total and degrades to a plain
//! string instead of failing.

use serde_json::Value;

/// Marker rendered for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Decimal places used when callers don't ask for anything else.
pub const DEFAULT_PRECISION: usize = 2;

/// Precision used for official historical IDSS scores.
pub const HISTORICAL_SCORE_PRECISION: usize = 4;

/// Score at or above which performance is considered good.
pub const GOOD_SCORE_THRESHOLD: f64 = 0.7;

/// Score at or above which performance is considered regular.
pub const REGULAR_SCORE_THRESHOLD: f64 = 0.4;

/// Formats a raw value with fixed precision, appending `%` for rates.
///
/// Returns [`NOT_AVAILABLE`] for null, absent or the literal `"N/A"`.
/// Values that don't parse as a finite number are returned in their plain
/// string form.
pub fn format_value(value: Option<&Value>, is_rate: bool, precision: usize) -> String {
    let value = match value {
        None | Some(Value::Null) => return NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) if s == NOT_AVAILABLE => return NOT_AVAILABLE.to_string(),
        Some(value) => value,
    };

    match as_number(value) {
        Some(number) if is_rate => format!("{:.*}%", precision, number),
        Some(number) => format!("{:.*}", precision, number),
        None => plain_string(value),
    }
}

/// Formats a score with the default precision and no rate suffix.
pub fn format_score(value: Option<&Value>) -> String {
    format_value(value, false, DEFAULT_PRECISION)
}

/// Renders a weight fraction (0–1) as an integer percentage, e.g. `0.35 -> "35%"`.
pub fn format_weight_percent(weight: Option<&Value>) -> String {
    match weight.and_then(as_number) {
        Some(fraction) => format!("{:.0}%", fraction * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Interprets a JSON value as a finite number.
///
/// Accepts JSON numbers, booleans (as 1 and 0) and strings holding a number
/// (surrounding whitespace is ignored).
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Regulatory relevance of an indicator inside the IDSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdssWeightLevel {
    High,
    Medium,
    Low,
    Undefined,
}

impl IdssWeightLevel {
    /// Maps the numeric level code used by the front-end (1, 2, 3).
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => IdssWeightLevel::High,
            Some(2) => IdssWeightLevel::Medium,
            Some(3) => IdssWeightLevel::Low,
            _ => IdssWeightLevel::Undefined,
        }
    }

    /// Display text, annotated with the weight used by the ANS document.
    pub fn text(&self) -> &'static str {
        match self {
            IdssWeightLevel::High => "Alta (Peso 3 no Doc. ANS)",
            IdssWeightLevel::Medium => "Média (Peso 2 no Doc. ANS)",
            IdssWeightLevel::Low => "Baixa (Peso 1 no Doc. ANS)",
            IdssWeightLevel::Undefined => "Não definida",
        }
    }
}

/// Performance band derived from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceStatus {
    /// No score available.
    NotAvailable,
    /// Score >= 0.7.
    GoodExcellent,
    /// 0.4 <= score < 0.7.
    Regular,
    /// Score < 0.4.
    PoorCritical,
}

impl PerformanceStatus {
    /// Classifies a final score.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => PerformanceStatus::NotAvailable,
            Some(s) if s >= GOOD_SCORE_THRESHOLD => PerformanceStatus::GoodExcellent,
            Some(s) if s >= REGULAR_SCORE_THRESHOLD => PerformanceStatus::Regular,
            Some(_) => PerformanceStatus::PoorCritical,
        }
    }

    /// Classifies a raw JSON score; non-numeric values count as missing.
    pub fn from_value(score: Option<&Value>) -> Self {
        Self::from_score(score.and_then(as_number))
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceStatus::NotAvailable => "N/D",
            PerformanceStatus::GoodExcellent => "bom/ótimo",
            PerformanceStatus::Regular => "regular",
            PerformanceStatus::PoorCritical => "ruim/crítico",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn absent_and_null_render_not_available() {
        assert_eq!(format_value(None, false, 2), "N/A");
        assert_eq!(format_value(Some(&Value::Null), true, 2), "N/A");
    }

    #[test]
    fn literal_not_available_is_preserved() {
        assert_eq!(format_value(Some(&json!("N/A")), true, 2), "N/A");
    }

    #[test]
    fn numbers_use_fixed_precision() {
        assert_eq!(format_value(Some(&json!(3.14159)), false, 2), "3.14");
        assert_eq!(format_value(Some(&json!(7)), false, 2), "7.00");
        assert_eq!(format_value(Some(&json!(0.87654)), false, 4), "0.8765");
    }

    #[test]
    fn rates_get_percent_suffix() {
        assert_eq!(format_value(Some(&json!(0.5)), true, 2), "0.50%");
        assert_eq!(format_value(Some(&json!(87.5)), true, 2), "87.50%");
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(format_value(Some(&json!(" 12.345 ")), false, 1), "12.3");
    }

    #[test]
    fn non_numeric_values_fall_back_to_string() {
        assert_eq!(format_value(Some(&json!("abc")), false, 2), "abc");
        assert_eq!(format_value(Some(&json!("NaN")), false, 2), "NaN");
    }

    #[test]
    fn booleans_format_as_numbers() {
        assert_eq!(format_value(Some(&json!(true)), false, 2), "1.00");
        assert_eq!(format_value(Some(&json!(false)), true, 1), "0.0%");
    }

    #[test]
    fn weight_renders_integer_percentage() {
        assert_eq!(format_weight_percent(Some(&json!(0.35))), "35%");
        assert_eq!(format_weight_percent(Some(&json!(0.1))), "10%");
        assert_eq!(format_weight_percent(Some(&json!(0))), "0%");
        assert_eq!(format_weight_percent(None), "N/A");
    }

    #[test]
    fn weight_levels_are_distinct() {
        let texts = [
            IdssWeightLevel::from_code(Some(1)).text(),
            IdssWeightLevel::from_code(Some(2)).text(),
            IdssWeightLevel::from_code(Some(3)).text(),
            IdssWeightLevel::from_code(Some(7)).text(),
        ];
        for (i, a) in texts.iter().enumerate() {
            assert!(!a.is_empty());
            for b in texts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert_eq!(IdssWeightLevel::from_code(None), IdssWeightLevel::Undefined);
        assert_eq!(IdssWeightLevel::from_code(Some(0)).text(), "Não definida");
    }

    #[test]
    fn performance_status_thresholds() {
        assert_eq!(PerformanceStatus::from_score(Some(0.75)), PerformanceStatus::GoodExcellent);
        assert_eq!(PerformanceStatus::from_score(Some(0.7)), PerformanceStatus::GoodExcellent);
        assert_eq!(PerformanceStatus::from_score(Some(0.5)), PerformanceStatus::Regular);
        assert_eq!(PerformanceStatus::from_score(Some(0.4)), PerformanceStatus::Regular);
        assert_eq!(PerformanceStatus::from_score(Some(0.1)), PerformanceStatus::PoorCritical);
        assert_eq!(PerformanceStatus::from_score(None), PerformanceStatus::NotAvailable);
    }

    #[test]
    fn performance_status_labels() {
        assert_eq!(PerformanceStatus::GoodExcellent.label(), "bom/ótimo");
        assert_eq!(PerformanceStatus::Regular.label(), "regular");
        assert_eq!(PerformanceStatus::PoorCritical.label(), "ruim/crítico");
        assert_eq!(PerformanceStatus::NotAvailable.label(), "N/D");
    }

    #[test]
    fn performance_status_from_text_score() {
        assert_eq!(
            PerformanceStatus::from_value(Some(&json!("0.9"))),
            PerformanceStatus::GoodExcellent
        );
        assert_eq!(
            PerformanceStatus::from_value(Some(&json!("n/d"))),
            PerformanceStatus::NotAvailable
        );
    }

    fn arbitrary_json() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            any::<f64>().prop_map(|n| json!(n)),
            ".*".prop_map(Value::String),
        ]
    }

    proptest! {
        #[test]
        fn format_value_never_panics(
            value in arbitrary_json(),
            is_rate in any::<bool>(),
            precision in 0usize..8,
        ) {
            let rendered = format_value(Some(&value), is_rate, precision);
            if value.is_null() {
                prop_assert_eq!(rendered, "N/A");
            }
        }

        #[test]
        fn finite_numbers_always_render_with_precision(n in -1.0e9f64..1.0e9, precision in 0usize..6) {
            let rendered = format_value(Some(&json!(n)), false, precision);
            let decimals = rendered.split('.').nth(1).map(str::len).unwrap_or(0);
            prop_assert_eq!(decimals, precision);
        }
    }
}
