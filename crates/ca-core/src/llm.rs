//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Default model used when no override is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Author of a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of a role-specific prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub stop_sequences: Vec<String>,
    pub timeout: Duration,
    /// JSON schema the response must follow. `None` requests free text.
    pub response_schema: Option<serde_json::Value>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: Some(0.0),
            top_p: None,
            top_k: None,
            stop_sequences: Vec::new(),
            timeout: Duration::from_secs(60),
            response_schema: None,
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers (e.g., Gemini)
///
/// A single provider instance is shared by every workflow step and every
/// concurrent run, so implementations must not keep per-call mutable state.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text with the provider's default configuration
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.model_id().to_string(),
            ..Default::default()
        };
        self.generate_with_config(messages, &config).await
    }

    /// Generate text with custom configuration
    async fn generate_with_config(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Request a JSON response that follows `schema`
    async fn generate_structured(
        &self,
        messages: &[Message],
        schema: serde_json::Value,
    ) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.model_id().to_string(),
            response_schema: Some(schema),
            ..Default::default()
        };
        self.generate_with_config(messages, &config).await
    }

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
