//! IDSS Analyst - AI-assisted analysis of healthcare-operator quality indicators.
//!
//! Turns IDSS indicator, dimension and index data sent by the dashboard into
//! a Brazilian-Portuguese prompt, asks Gemini for an analysis and returns it
//! over HTTP (`POST /api/analyze`) or as a serverless function response.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
