//! Gemini client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use ca_core::{Error, GenerationConfig, GenerationResult, LlmProvider, Message, Result, Role};

use crate::config::GeminiConfig;

/// Gemini `generateContent` client
///
/// Holds no per-request state, so one instance can be shared behind an
/// `Arc` by every step of every concurrent run.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
    current_model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationParams,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Outcome of a single HTTP attempt, split by whether retrying can help
enum Failure {
    Transient(Error),
    Fatal(Error),
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let current_model = config.model.clone();
        Ok(Self {
            config,
            client,
            current_model,
        })
    }

    /// Create a new Gemini client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url, model_id
        )
    }

    pub(crate) fn build_request(
        messages: &[Message],
        config: &GenerationConfig,
    ) -> GenerateContentRequest {
        let system_text = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let system_instruction = if system_text.is_empty() {
            None
        } else {
            Some(Content {
                role: None,
                parts: vec![Part { text: system_text }],
            })
        };

        let contents = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        let response_mime_type = config
            .response_schema
            .as_ref()
            .map(|_| "application/json".to_string());

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: GenerationParams {
                temperature: config.temperature,
                max_output_tokens: config.max_tokens,
                top_p: config.top_p,
                top_k: config.top_k,
                stop_sequences: config.stop_sequences.clone(),
                response_mime_type,
                response_schema: config.response_schema.clone(),
            },
        }
    }

    /// Perform one generation request
    async fn perform_generation(
        &self,
        request: &GenerateContentRequest,
        model_id: &str,
    ) -> std::result::Result<GenerationResult, Failure> {
        let response = self
            .client
            .post(self.endpoint(model_id))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Failure::Transient(Error::Network(e.to_string())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Failure::Transient(Error::Network(e.to_string())))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| Failure::Fatal(Error::Serialization(e.to_string())))?;

        let finish_reason = parsed
            .candidates
            .iter()
            .find_map(|candidate| candidate.finish_reason.clone());
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .collect::<String>();

        // Blank output is left to the calling step, which owns its fallback.
        if text.trim().is_empty() {
            tracing::warn!(
                model = model_id,
                finish_reason = finish_reason.as_deref().unwrap_or("unknown"),
                "Gemini returned no text"
            );
        }

        Ok(GenerationResult {
            text: text.trim().to_string(),
            model_id: model_id.to_string(),
            tokens_used: parsed.usage_metadata.and_then(|u| u.total_token_count),
        })
    }
}

/// Map a non-success response to a retry decision and an error category
fn classify_failure(status: StatusCode, body: &str) -> Failure {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .ok();
    let message = detail
        .as_ref()
        .map(|d| d.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());
    let exhausted = detail
        .as_ref()
        .is_some_and(|d| d.status == "RESOURCE_EXHAUSTED");

    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        return Failure::Transient(Error::RateLimited(format!("{}: {}", status, message)));
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Failure::Fatal(
            Error::Authentication(format!("Gemini rejected the API key ({}): {}", status, message)),
        ),
        s if s.is_server_error() => Failure::Transient(Error::LlmProvider(format!(
            "Gemini API request failed with status {}: {}",
            s, message
        ))),
        s => Failure::Fatal(Error::LlmProvider(format!(
            "Gemini API request failed with status {}: {}",
            s, message
        ))),
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate_with_config(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request = Self::build_request(messages, config);
        let model_id = if config.model_id.is_empty() {
            self.current_model.as_str()
        } else {
            config.model_id.as_str()
        };

        let mut attempt = 0;
        loop {
            let outcome = match timeout(config.timeout, self.perform_generation(&request, model_id))
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => return Err(Error::Timeout("Gemini request timed out".to_string())),
            };

            match outcome {
                Ok(result) => {
                    tracing::debug!(
                        model = model_id,
                        attempt,
                        tokens = ?result.tokens_used,
                        "Gemini generation succeeded"
                    );
                    return Ok(result);
                }
                Err(Failure::Transient(err)) if attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, "Transient Gemini failure, retrying");
                    tokio::time::sleep(self.config.retry_backoff * attempt).await;
                }
                Err(Failure::Transient(err)) | Err(Failure::Fatal(err)) => return Err(err),
            }
        }
    }

    fn model_id(&self) -> &str {
        &self.current_model
    }
}
