//! IDSS Analyst server.
//!
//! Serves `POST /api/analyze` and the built front-end until Ctrl-C or SIGTERM.

use std::process::ExitCode;

use thiserror::Error;
use tokio::net::TcpListener;

use idss_analyst::adapters::http::{build_router, AnalysisAppState};
use idss_analyst::application::{AnalysisError, AnalyzeHandler};
use idss_analyst::config::{AppConfig, ConfigError, ValidationError};
use idss_analyst::telemetry::init_tracing;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to build completion client: {0}")]
    Client(#[from] AnalysisError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Server terminated with error");
            eprintln!("idss-analyst: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load_validated()?;
    init_tracing(&config.server.log_level, config.server.log_format)?;

    let handler = AnalyzeHandler::from_config(&config.ai)?;
    if handler.is_configured() {
        tracing::info!(model = %config.ai.model, "Gemini client configured");
    } else {
        tracing::warn!("API_KEY is not set; /api/analyze will answer with 500 until it is configured");
    }

    if !config.server.static_dir.is_dir() {
        tracing::warn!(
            static_dir = %config.server.static_dir.display(),
            "Static directory not found; only the API will be served"
        );
    }

    let app = build_router(AnalysisAppState::new(handler), &config.server.static_dir);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
