//! Adapters - Implementations of ports and inbound interfaces.
//!
//! - `ai` - Completion clients (Gemini, mock)
//! - `http` - axum router, handlers and middleware
//! - `function` - Serverless function event adapter

pub mod ai;
pub mod function;
pub mod http;
