//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `IDSS_ANALYST` prefix and
//! nested values are separated by double underscores. The Gemini key is also
//! read from the bare `API_KEY` variable, which takes precedence.
//!
//! # Example
//!
//! ```no_run
//! use idss_analyst::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

/// Environment variable prefix for structured settings.
pub const ENV_PREFIX: &str = "IDSS_ANALYST";

/// Bare variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, static files, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gemini client configuration
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `IDSS_ANALYST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Overlays `API_KEY` onto `ai.api_key`
    ///
    /// # Environment Variable Format
    ///
    /// - `IDSS_ANALYST__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `IDSS_ANALYST__AI__MODEL=...` -> `ai.model = ...`
    /// - `API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .set_override_option("ai.api_key", std::env::var(API_KEY_VAR).ok())?
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// A missing API key is not an error here; it is reported per request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}
