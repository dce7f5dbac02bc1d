//! Single-request entry point.
//!
//! Reads one function event (`{"httpMethod": ..., "body": ...}`) from stdin
//! and writes one `{"statusCode", "headers", "body"}` response to stdout.

use std::process::ExitCode;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use idss_analyst::adapters::function::handle_raw_event;
use idss_analyst::application::{AnalysisError, AnalyzeHandler};
use idss_analyst::config::{AppConfig, ConfigError};
use idss_analyst::telemetry::init_tracing;

#[derive(Debug, Error)]
enum FunctionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to build completion client: {0}")]
    Client(#[from] AnalysisError),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("analyze-function: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), FunctionError> {
    let config = AppConfig::load_validated()?;
    init_tracing(&config.server.log_level, config.server.log_format)?;

    let handler = AnalyzeHandler::from_config(&config.ai)?;

    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;

    let response = handle_raw_event(&handler, &raw).await;
    tracing::info!(status = response.status_code, "Function event handled");

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&serde_json::to_vec(&response)?).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
