//! Data Transfer Objects for the analysis endpoint.

use serde::{Deserialize, Serialize};

/// Successful analysis response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// Error response body, shared by every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serializes_single_field() {
        let json = serde_json::to_value(ErrorResponse::new("falhou")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "falhou" }));
    }

    #[test]
    fn analysis_response_serializes_single_field() {
        let json = serde_json::to_value(AnalysisResponse {
            analysis: "texto".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "analysis": "texto" }));
    }
}
