//! Gemini Provider - Implementation of CompletionClient for Google's Gemini API.
//!
//! One `generateContent` call per prompt with a fixed decoding configuration
//! and fixed safety thresholds. No retries.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash-preview-04-17")
//!     .with_timeout(Duration::from_secs(120));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! # Classification
//!
//! Responses are classified in order: prompt-level block, abnormal finish
//! reason, non-empty text, and finally an empty-response error.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AiConfig;
use crate::domain::idss::Prompt;
use crate::ports::{CompletionClient, CompletionOutcome, ProviderInfo, SafetyRating};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 64;
const BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Finish reasons that mean the model completed normally.
const NORMAL_FINISH_REASONS: [&str; 3] = ["STOP", "MAX_TOKENS", "FINISH_REASON_UNSPECIFIED"];

const EMPTY_RESPONSE_MESSAGE: &str =
    "A API Gemini retornou uma resposta vazia sem detalhes de bloqueio claros.";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, sent in the `x-goog-api-key` header.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds the provider configuration from application config.
    ///
    /// Returns `None` when no API key is configured.
    pub fn from_ai_config(config: &AiConfig) -> Option<Self> {
        let key = config.api_key()?;
        Some(
            Self::new(key)
                .with_model(&config.model)
                .with_base_url(&config.base_url)
                .with_timeout(config.timeout()),
        )
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Failures inside the adapter. Flattened into [`CompletionOutcome::Error`].
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("falha ao criar o cliente HTTP: {0}")]
    ClientBuild(String),

    #[error("tempo limite excedido após {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("falha de rede: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("resposta inválida da API: {0}")]
    Decode(String),
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeminiError::ClientBuild(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    async fn send(&self, prompt: &Prompt) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(&GenerateContentRequest::for_prompt(prompt.as_str()))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    GeminiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CompletionClient for GeminiProvider {
    async fn complete(&self, prompt: &Prompt) -> CompletionOutcome {
        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.as_str().len(),
            "Sending request to Gemini API"
        );

        match self.send(prompt).await {
            Ok(response) => classify(response),
            Err(err) => {
                tracing::error!(model = %self.config.model, error = %err, "Gemini request failed");
                CompletionOutcome::error(err.to_string())
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

/// Pulls `error.message` out of a Google error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "sem corpo de resposta".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

/// Classifies a decoded response into an outcome.
fn classify(response: GenerateContentResponse) -> CompletionOutcome {
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            tracing::warn!(block_reason = %reason, "Prompt blocked by Gemini");
            return CompletionOutcome::blocked(
                format!("Bloqueado: {reason}"),
                into_ratings(feedback.safety_ratings),
            );
        }
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return CompletionOutcome::error(EMPTY_RESPONSE_MESSAGE);
    };

    if let Some(reason) = candidate
        .finish_reason
        .as_deref()
        .filter(|r| !NORMAL_FINISH_REASONS.contains(r))
    {
        tracing::warn!(finish_reason = %reason, "Gemini candidate finished abnormally");
        return CompletionOutcome::blocked(
            format!("Finalizado por: {reason}"),
            into_ratings(candidate.safety_ratings),
        );
    }

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        CompletionOutcome::error(EMPTY_RESPONSE_MESSAGE)
    } else {
        CompletionOutcome::success(text)
    }
}

fn into_ratings(ratings: Vec<WireSafetyRating>) -> Vec<SafetyRating> {
    ratings
        .into_iter()
        .map(|r| SafetyRating::new(r.category, r.probability))
        .collect()
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl<'a> GenerateContentRequest<'a> {
    fn for_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
            safety_settings: HARM_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: BLOCK_THRESHOLD,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<WireSafetyRating>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<WireSafetyRating>,
}

#[derive(Debug, Deserialize)]
struct WireSafetyRating {
    category: String,
    probability: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}
