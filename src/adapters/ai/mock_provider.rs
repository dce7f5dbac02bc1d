//! Mock completion client for testing.
//!
//! Provides a configurable implementation of the CompletionClient port,
//! allowing tests to run without calling the real Gemini API.
//!
//! # Features
//!
//! - Pre-configured outcomes, consumed in order
//! - Simulated delays
//! - Prompt recording for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockCompletionClient::new()
//!     .with_success("Análise gerada")
//!     .with_blocked("Bloqueado: SAFETY", vec![]);
//!
//! let outcome = client.complete(&prompt).await;
//! assert_eq!(client.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::idss::Prompt;
use crate::ports::{CompletionClient, CompletionOutcome, ProviderInfo, SafetyRating};

/// Text returned once the configured outcomes run out.
pub const DEFAULT_MOCK_ANALYSIS: &str = "Análise simulada.";

/// Mock completion client for testing.
#[derive(Debug, Clone)]
pub struct MockCompletionClient {
    /// Pre-configured outcomes (consumed in order).
    outcomes: Arc<Mutex<VecDeque<CompletionOutcome>>>,
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Prompts received, in call order.
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks a mutex, recovering the data if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockCompletionClient {
    /// Creates a new mock client with default settings.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues an arbitrary outcome.
    pub fn with_outcome(self, outcome: CompletionOutcome) -> Self {
        lock(&self.outcomes).push_back(outcome);
        self
    }

    /// Queues a successful completion.
    pub fn with_success(self, text: impl Into<String>) -> Self {
        self.with_outcome(CompletionOutcome::success(text))
    }

    /// Queues a safety block.
    pub fn with_blocked(self, reason: impl Into<String>, ratings: Vec<SafetyRating>) -> Self {
        self.with_outcome(CompletionOutcome::blocked(reason, ratings))
    }

    /// Queues a provider error.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.with_outcome(CompletionOutcome::error(message))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this client.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded prompts.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Returns the most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.calls).last().cloned()
    }

    fn next_outcome(&self) -> CompletionOutcome {
        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| CompletionOutcome::success(DEFAULT_MOCK_ANALYSIS))
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &Prompt) -> CompletionOutcome {
        lock(&self.calls).push(prompt.as_str().to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_outcome()
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::idss::{build_prompt_with_default_year, AnalysisRequest};

    fn test_prompt() -> Prompt {
        let request: AnalysisRequest = serde_json::from_value(serde_json::json!({
            "type": "indicator_last_period",
            "indicatorData": { "indicatorName": "Taxa X" }
        }))
        .unwrap();
        build_prompt_with_default_year(&request, 2024).unwrap()
    }

    #[tokio::test]
    async fn returns_outcomes_in_order() {
        let client = MockCompletionClient::new()
            .with_success("Primeira")
            .with_blocked("Bloqueado: SAFETY", vec![])
            .with_error("falhou");

        assert_eq!(
            client.complete(&test_prompt()).await,
            CompletionOutcome::success("Primeira")
        );
        assert!(matches!(
            client.complete(&test_prompt()).await,
            CompletionOutcome::Blocked { .. }
        ));
        assert_eq!(
            client.complete(&test_prompt()).await,
            CompletionOutcome::error("falhou")
        );
    }

    #[tokio::test]
    async fn returns_default_after_exhausted() {
        let client = MockCompletionClient::new().with_success("Única");

        client.complete(&test_prompt()).await;
        let second = client.complete(&test_prompt()).await;

        assert_eq!(second, CompletionOutcome::success(DEFAULT_MOCK_ANALYSIS));
    }

    #[tokio::test]
    async fn records_prompts() {
        let client = MockCompletionClient::new();
        assert_eq!(client.call_count(), 0);
        assert!(client.last_prompt().is_none());

        let prompt = test_prompt();
        client.complete(&prompt).await;

        assert_eq!(client.call_count(), 1);
        assert_eq!(client.last_prompt().as_deref(), Some(prompt.as_str()));
        assert_eq!(client.prompts().len(), 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let client = MockCompletionClient::new();
        let clone = client.clone();

        clone.complete(&test_prompt()).await;

        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn respects_delay() {
        let client = MockCompletionClient::new().with_delay(Duration::from_millis(20));

        let start = std::time::Instant::now();
        client.complete(&test_prompt()).await;

        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn reports_provider_info() {
        let info = MockCompletionClient::new().provider_info();
        assert_eq!(info.name, "mock");
        assert_eq!(info.model, "mock-model-1");
    }
}
