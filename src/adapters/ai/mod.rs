//! Completion client adapters.
//!
//! - `GeminiProvider` - Google Gemini `generateContent`
//! - `MockCompletionClient` - Configurable mock for testing

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{
    GeminiConfig, GeminiError, GeminiProvider, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT,
};
pub use mock_provider::{MockCompletionClient, DEFAULT_MOCK_ANALYSIS};
