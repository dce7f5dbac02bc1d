//! Errors returned by the analysis handler.
//!
//! Every variant maps to one HTTP status and a Brazilian-Portuguese message
//! that is returned to the caller as `{"error": "<message>"}`.

use http::StatusCode;
use thiserror::Error;

use crate::domain::idss::PromptError;

/// Failures of a single analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Método não permitido. Use POST.")]
    MethodNotAllowed,

    #[error("Chave da API Gemini não configurada no servidor.")]
    Configuration,

    #[error("Corpo da requisição JSON inválido.")]
    MalformedRequestBody,

    #[error("{0}")]
    InvalidAnalysisType(PromptError),

    #[error("{0}")]
    MissingPayloadData(PromptError),

    #[error("Sua solicitação para análise foi bloqueada ou retornou vazia. {reason}. Detalhes de Segurança: {safety_details}")]
    ContentBlocked {
        reason: String,
        safety_details: String,
    },

    #[error("Erro na API do Gemini: {0}")]
    Upstream(String),

    #[error("Ocorreu um erro inesperado no servidor: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AnalysisError::MalformedRequestBody
            | AnalysisError::InvalidAnalysisType(_)
            | AnalysisError::MissingPayloadData(_)
            | AnalysisError::ContentBlocked { .. } => StatusCode::BAD_REQUEST,
            AnalysisError::Configuration
            | AnalysisError::Upstream(_)
            | AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MethodNotAllowed => "method_not_allowed",
            AnalysisError::Configuration => "configuration",
            AnalysisError::MalformedRequestBody => "malformed_request_body",
            AnalysisError::InvalidAnalysisType(_) => "invalid_analysis_type",
            AnalysisError::MissingPayloadData(_) => "missing_payload_data",
            AnalysisError::ContentBlocked { .. } => "content_blocked",
            AnalysisError::Upstream(_) => "upstream",
            AnalysisError::Internal(_) => "internal",
        }
    }
}

impl From<PromptError> for AnalysisError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::InvalidAnalysisType(_) => AnalysisError::InvalidAnalysisType(err),
            PromptError::MissingData { .. } => AnalysisError::MissingPayloadData(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::idss::AnalysisType;

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (AnalysisError::MethodNotAllowed, 405),
            (AnalysisError::Configuration, 500),
            (AnalysisError::MalformedRequestBody, 400),
            (PromptError::invalid_type(Some("x")).into(), 400),
            (PromptError::missing_data(AnalysisType::Idss).into(), 400),
            (
                AnalysisError::ContentBlocked {
                    reason: "Bloqueado: SAFETY".into(),
                    safety_details: "N/A".into(),
                },
                400,
            ),
            (AnalysisError::Upstream("x".into()), 500),
            (AnalysisError::Internal("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{}", err.kind());
        }
    }

    #[test]
    fn prompt_errors_map_to_matching_variant() {
        assert!(matches!(
            AnalysisError::from(PromptError::invalid_type(None)),
            AnalysisError::InvalidAnalysisType(_)
        ));
        assert!(matches!(
            AnalysisError::from(PromptError::missing_data(AnalysisType::Dimension)),
            AnalysisError::MissingPayloadData(_)
        ));
    }

    #[test]
    fn blocked_message_includes_reason_and_details() {
        let err = AnalysisError::ContentBlocked {
            reason: "Bloqueado: SAFETY".into(),
            safety_details: "HARM_CATEGORY_HARASSMENT: HIGH".into(),
        };
        let message = err.user_message();
        assert!(message.contains("Bloqueado: SAFETY"));
        assert!(message.contains("Detalhes de Segurança: HARM_CATEGORY_HARASSMENT: HIGH"));
    }

    #[test]
    fn upstream_message_embeds_cause() {
        assert_eq!(
            AnalysisError::Upstream("HTTP 503: overloaded".into()).user_message(),
            "Erro na API do Gemini: HTTP 503: overloaded"
        );
    }

    #[test]
    fn configuration_message_mentions_key() {
        assert!(AnalysisError::Configuration.user_message().contains("não configurada"));
    }
}
