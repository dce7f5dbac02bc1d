//! Completion Client Port - Interface to the text-generation service.
//!
//! The analysis handler hands over an assembled prompt and receives a
//! three-way outcome: generated text, a safety block, or an error. Provider
//! failures never surface as `Err`; they are folded into
//! [`CompletionOutcome::Error`] so the caller decides the HTTP status.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoClient;
//!
//! #[async_trait]
//! impl CompletionClient for EchoClient {
//!     async fn complete(&self, prompt: &Prompt) -> CompletionOutcome {
//!         CompletionOutcome::success(prompt.as_str())
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::idss::Prompt;

/// Port for the text-generation provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one prompt and classifies the result. Never retries.
    async fn complete(&self, prompt: &Prompt) -> CompletionOutcome;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Result of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The model produced text.
    Success { text: String },

    /// The prompt or the response was stopped by a safety filter.
    Blocked {
        /// `"Bloqueado: <REASON>"` or `"Finalizado por: <REASON>"`.
        reason: String,
        safety_ratings: Vec<SafetyRating>,
    },

    /// Transport failure, non-2xx status, undecodable or empty response.
    Error { message: String },
}

impl CompletionOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn blocked(reason: impl Into<String>, safety_ratings: Vec<SafetyRating>) -> Self {
        Self::Blocked {
            reason: reason.into(),
            safety_ratings,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Probability reported by the provider for one harm category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRating {
    pub category: String,
    pub probability: String,
}

impl SafetyRating {
    pub fn new(category: impl Into<String>, probability: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            probability: probability.into(),
        }
    }
}

/// Renders ratings as `"CATEGORY: PROBABILITY"` joined by `", "`, or `"N/A"`.
pub fn safety_details(ratings: &[SafetyRating]) -> String {
    if ratings.is_empty() {
        return "N/A".to_string();
    }
    ratings
        .iter()
        .map(|r| format!("{}: {}", r.category, r.probability))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Provider identification, used for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_details_joins_ratings() {
        let ratings = vec![
            SafetyRating::new("HARM_CATEGORY_HARASSMENT", "LOW"),
            SafetyRating::new("HARM_CATEGORY_HATE_SPEECH", "HIGH"),
        ];
        assert_eq!(
            safety_details(&ratings),
            "HARM_CATEGORY_HARASSMENT: LOW, HARM_CATEGORY_HATE_SPEECH: HIGH"
        );
    }

    #[test]
    fn safety_details_without_ratings() {
        assert_eq!(safety_details(&[]), "N/A");
    }

    #[test]
    fn outcome_constructors() {
        assert!(CompletionOutcome::success("ok").is_success());
        assert!(!CompletionOutcome::error("boom").is_success());
        assert_eq!(
            CompletionOutcome::blocked("Bloqueado: SAFETY", vec![]),
            CompletionOutcome::Blocked {
                reason: "Bloqueado: SAFETY".to_string(),
                safety_ratings: vec![],
            }
        );
    }
}
