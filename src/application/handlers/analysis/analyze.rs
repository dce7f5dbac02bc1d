//! AnalyzeHandler - Command handler for one IDSS analysis request.
//!
//! Checks the method and credential, parses the body, builds the prompt and
//! calls the completion client. Any step may short-circuit with an
//! [`AnalysisError`].

use std::sync::Arc;

use http::Method;

use super::AnalysisError;
use crate::adapters::ai::{GeminiConfig, GeminiProvider};
use crate::config::AiConfig;
use crate::domain::idss::{build_prompt, AnalysisRequest, AnalysisType};
use crate::ports::{safety_details, CompletionClient, CompletionOutcome};

/// Number of prompt characters written to the debug log.
const PROMPT_LOG_PREVIEW: usize = 500;

/// Command carrying one raw HTTP request.
#[derive(Debug, Clone)]
pub struct AnalyzeCommand {
    pub method: Method,
    pub body: Vec<u8>,
}

impl AnalyzeCommand {
    pub fn new(method: Method, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }

    /// Convenience for a POST with a JSON body.
    pub fn post(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::POST, body)
    }
}

/// Result of a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeResult {
    pub analysis: String,
    pub analysis_type: AnalysisType,
}

/// Handler for analysis requests.
///
/// `client` is `None` when no API key is configured; every request then
/// fails with [`AnalysisError::Configuration`].
#[derive(Clone)]
pub struct AnalyzeHandler {
    client: Option<Arc<dyn CompletionClient>>,
}

impl AnalyzeHandler {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Handler without a completion client.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    /// Builds the Gemini-backed handler, or an unconfigured one if no key is set.
    pub fn from_config(config: &AiConfig) -> Result<Self, AnalysisError> {
        let Some(gemini) = GeminiConfig::from_ai_config(config) else {
            return Ok(Self::unconfigured());
        };
        let provider =
            GeminiProvider::new(gemini).map_err(|e| AnalysisError::Internal(e.to_string()))?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn handle(&self, cmd: AnalyzeCommand) -> Result<AnalyzeResult, AnalysisError> {
        let result = self.run(cmd).await;
        if let Err(err) = &result {
            tracing::info!(
                error_kind = err.kind(),
                status = err.status_code().as_u16(),
                "Analysis request rejected"
            );
        }
        result
    }

    async fn run(&self, cmd: AnalyzeCommand) -> Result<AnalyzeResult, AnalysisError> {
        if cmd.method != Method::POST {
            return Err(AnalysisError::MethodNotAllowed);
        }

        let client = self.client.as_ref().ok_or_else(|| {
            tracing::error!("Gemini API key is not configured");
            AnalysisError::Configuration
        })?;

        let request = parse_body(&cmd.body)?;
        let analysis_type = request.resolve()?.analysis_type();
        let prompt = build_prompt(&request)?;

        tracing::info!(
            analysis_type = %analysis_type,
            reference_year = ?request.active_reference_year,
            operator_size = %request.operator_size(),
            "Analysis requested"
        );
        tracing::debug!(prompt = %prompt.preview(PROMPT_LOG_PREVIEW), "Prompt assembled");

        match client.complete(&prompt).await {
            CompletionOutcome::Success { text } => {
                tracing::info!(
                    analysis_type = %analysis_type,
                    provider = %client.provider_info().name,
                    response_len = text.len(),
                    "Analysis completed"
                );
                Ok(AnalyzeResult {
                    analysis: text,
                    analysis_type,
                })
            }
            CompletionOutcome::Blocked {
                reason,
                safety_ratings,
            } => {
                let safety_details = safety_details(&safety_ratings);
                tracing::warn!(
                    analysis_type = %analysis_type,
                    %reason,
                    %safety_details,
                    "Analysis blocked"
                );
                Err(AnalysisError::ContentBlocked {
                    reason,
                    safety_details,
                })
            }
            CompletionOutcome::Error { message } => {
                tracing::error!(analysis_type = %analysis_type, %message, "Completion failed");
                Err(AnalysisError::Upstream(message))
            }
        }
    }
}

/// Parses the request body. An empty body counts as `{}`.
fn parse_body(body: &[u8]) -> Result<AnalysisRequest, AnalysisError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AnalysisRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Malformed request body");
        AnalysisError::MalformedRequestBody
    })
}
