//! Gemini configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use ca_core::config::{env_var, parse_or};
use ca_core::{DEFAULT_MODEL, Error, Result};

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the Gemini client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    /// Extra attempts for transient failures (rate limits, 5xx, network)
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl GeminiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(env_var)
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .ok_or_else(|| {
                Error::Configuration(
                    "GOOGLE_API_KEY or GEMINI_API_KEY environment variable not found".to_string(),
                )
            })?;

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_url = lookup("GEMINI_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let max_retries = parse_or(&lookup, "LLM_MAX_RETRIES", 2u32)?;

        Ok(Self {
            api_key,
            model,
            api_url,
            max_retries,
            retry_backoff: Duration::from_millis(500),
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }

    /// Point the client at a different endpoint (proxies, local mocks)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}
