use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::generation::generator::EmptySessionPolicy;
use crate::generation::retry::RetryPolicy;
use crate::llm_client::LlmConfig;

const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm: LlmConfig,
    pub retry: RetryPolicy,
    pub empty_session_policy: EmptySessionPolicy,
    /// Seeds the fallback shuffle. Unset in production.
    pub fallback_seed: Option<u64>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm: LlmConfig {
                api_url: optional_env("LLM_API_URL")?
                    .unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
                api_key: require_env("GROQ_API_KEY")?,
                model: optional_env("LLM_MODEL")?
                    .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                temperature: optional_env("LLM_TEMPERATURE")?.unwrap_or(0.2),
                max_tokens: optional_env("LLM_MAX_TOKENS")?.unwrap_or(1000),
                timeout: Duration::from_secs(optional_env("LLM_TIMEOUT_SECS")?.unwrap_or(60)),
            },
            retry: RetryPolicy::new(
                optional_env("GENERATION_MAX_ATTEMPTS")?.unwrap_or(3),
                Duration::from_millis(optional_env("GENERATION_BASE_DELAY_MS")?.unwrap_or(500)),
            ),
            empty_session_policy: optional_env("EMPTY_SESSION_POLICY")?.unwrap_or_default(),
            fallback_seed: optional_env("FALLBACK_SEED")?,
            port: optional_env("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads and parses an optional variable. Unset is `None`; set but unparseable is an error.
fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Environment variable '{key}' is invalid: {e}")),
        Err(_) => Ok(None),
    }
}
