//! Workflow configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use ca_core::Result;
use ca_core::config::{env_var, parse_or};

use crate::state::Grade;

/// Tuning for one workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Rewrite cycles allowed before generation is forced
    pub max_retries: u32,
    /// Grade that lets a run proceed to generation
    pub proceed_on: Grade,
    /// Chunks requested from the store per retrieval
    pub chunk_limit: usize,
    /// Upper bound for each individual step
    pub step_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            proceed_on: Grade::Relevant,
            chunk_limit: 3,
            step_timeout: Duration::from_secs(60),
        }
    }
}

impl AgentConfig {
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
        let defaults = Self::default();

        Ok(Self {
            max_retries: parse_or(&lookup, "MAX_RETRIES", defaults.max_retries)?,
            proceed_on: parse_or(&lookup, "PROCEED_GRADE", defaults.proceed_on)?,
            chunk_limit: parse_or(&lookup, "CHUNK_LIMIT", defaults.chunk_limit)?,
            step_timeout: Duration::from_secs(parse_or(
                &lookup,
                "STEP_TIMEOUT_SECS",
                defaults.step_timeout.as_secs(),
            )?),
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }
}
