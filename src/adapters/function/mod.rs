//! Serverless function adapter.
//!
//! Translates one function-platform event (`httpMethod`, `body`, ...) into an
//! [`AnalyzeCommand`] and the result back into a `{statusCode, headers, body}`
//! response. Used by the `analyze-function` binary.

use std::collections::BTreeMap;

use http::{Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::adapters::http::analysis::{AnalysisResponse, ErrorResponse};
use crate::adapters::http::middleware::CORS_HEADERS;
use crate::application::{AnalysisError, AnalyzeCommand, AnalyzeHandler};

/// Incoming function event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

/// Platforms send `null` for fields they leave unset on direct invocations.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FunctionEvent {
    /// A POST event with a JSON body.
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: Method::POST.to_string(),
            body: Some(body.into()),
            ..Default::default()
        }
    }
}

/// Outgoing function response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        let body = serde_json::to_string(payload).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize function response");
            r#"{"error":"Ocorreu um erro inesperado no servidor."}"#.to_string()
        });

        let mut headers: BTreeMap<String, String> = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }

    fn from_error(err: &AnalysisError) -> Self {
        Self::json(err.status_code(), &ErrorResponse::new(err.user_message()))
    }
}

/// Handles one function event end to end.
pub async fn handle_event(handler: &AnalyzeHandler, event: FunctionEvent) -> FunctionResponse {
    tracing::info!(
        method = %event.http_method,
        path = event.path.as_deref().unwrap_or("-"),
        "Function event received"
    );

    let method = match Method::from_bytes(event.http_method.trim().to_ascii_uppercase().as_bytes())
    {
        Ok(method) => method,
        Err(_) => return FunctionResponse::from_error(&AnalysisError::MethodNotAllowed),
    };

    // Binary payloads are never valid analysis requests.
    if event.is_base64_encoded && method == Method::POST {
        return FunctionResponse::from_error(&AnalysisError::MalformedRequestBody);
    }

    let body = event.body.unwrap_or_default().into_bytes();
    match handler.handle(AnalyzeCommand::new(method, body)).await {
        Ok(result) => FunctionResponse::json(
            StatusCode::OK,
            &AnalysisResponse {
                analysis: result.analysis,
            },
        ),
        Err(err) => FunctionResponse::from_error(&err),
    }
}

/// Parses a raw event document and handles it.
///
/// An unreadable event is answered with a 400 response rather than an error.
pub async fn handle_raw_event(handler: &AnalyzeHandler, raw: &str) -> FunctionResponse {
    match serde_json::from_str::<FunctionEvent>(raw) {
        Ok(event) => handle_event(handler, event).await,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable function event");
            FunctionResponse::from_error(&AnalysisError::MalformedRequestBody)
        }
    }
}
