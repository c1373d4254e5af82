//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// Gemini's OpenAI-compatible chat completions endpoint.
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub llm_base_url: String,
    pub qa_model: String,
    pub prompt_char_budget: usize,
    pub max_upload_bytes: usize,
    pub fetch_timeout: Duration,
    pub llm_timeout: Duration,
    pub document_ttl: Duration,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN").filter(|v| !v.trim().is_empty());

        // --- LLM Settings ---
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|v| !v.is_empty());
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty());
        let llm_base_url =
            lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
        let qa_model = lookup("QA_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string());

        // --- Limits ---
        let prompt_char_budget = positive(&lookup, "PROMPT_CHAR_BUDGET", 6000)?;
        let max_upload_bytes = positive(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;
        let fetch_timeout = Duration::from_secs(positive(&lookup, "FETCH_TIMEOUT_SECS", 30)?);
        let llm_timeout = Duration::from_secs(positive(&lookup, "LLM_TIMEOUT_SECS", 60)?);
        let document_ttl = Duration::from_secs(positive(&lookup, "DOCUMENT_TTL_SECS", 3600)?);

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            openai_api_key,
            llm_base_url,
            qa_model,
            prompt_char_budget,
            max_upload_bytes,
            fetch_timeout,
            llm_timeout,
            document_ttl,
            cors_allowed_origin,
        })
    }

    /// The key used against the LLM endpoint. Gemini wins when both are set.
    pub fn llm_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .or(self.openai_api_key.as_deref())
            .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))
    }
}

/// Parses an optional, strictly positive number, falling back to `default`.
fn positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not a positive integer", raw),
        )),
    }
}
