//! Scripted collaborators for workflow tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use ca_core::{
    Chunk, DocumentStore, Error, GenerationConfig, GenerationResult, LlmProvider, Message,
    Result, Retrieval,
};

use crate::prompts;

/// Which prompt role a model call was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Grade,
    Rewrite,
    Generate,
}

/// Model double that answers each prompt role from its own script
#[derive(Default)]
pub struct ScriptedLlm {
    grades: Mutex<VecDeque<String>>,
    rewrites: Mutex<VecDeque<String>>,
    answer: String,
    failure: Option<(Call, fn() -> Error)>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    generate_prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            answer: "Remote work is allowed three days per week.".to_string(),
            ..Default::default()
        }
    }

    pub fn with_grades(self, grades: &[&str]) -> Self {
        *self.grades.lock().unwrap() = grades.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_rewrites(self, rewrites: &[&str]) -> Self {
        *self.rewrites.lock().unwrap() = rewrites.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub fn failing_on(mut self, call: Call, error: fn() -> Error) -> Self {
        self.failure = Some((call, error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// User messages sent to the Generate role, in order
    pub fn generate_prompts(&self) -> Vec<String> {
        self.generate_prompts.lock().unwrap().clone()
    }

    fn classify(messages: &[Message], config: &GenerationConfig) -> Call {
        if config.response_schema.is_some() {
            Call::Grade
        } else if messages
            .first()
            .is_some_and(|m| m.content == prompts::REWRITE_SYSTEM)
        {
            Call::Rewrite
        } else {
            Call::Generate
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate_with_config(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let call = Self::classify(messages, config);
        self.calls.lock().unwrap().push(call);

        if let Some((failing, error)) = self.failure {
            if failing == call {
                return Err(error());
            }
        }

        let text = match call {
            Call::Grade => self
                .grades
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| r#"{"binary_score": "no"}"#.to_string()),
            Call::Rewrite => self
                .rewrites
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "rephrased question".to_string()),
            Call::Generate => {
                let user = messages.last().map(|m| m.content.clone()).unwrap_or_default();
                self.generate_prompts.lock().unwrap().push(user);
                self.answer.clone()
            }
        };

        Ok(GenerationResult {
            text,
            model_id: "scripted".to_string(),
            tokens_used: None,
        })
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

/// Store double that serves one scripted retrieval per search
pub struct ScriptedStore {
    batches: Mutex<VecDeque<Retrieval>>,
    fallback: Retrieval,
    queries: Mutex<Vec<String>>,
}

impl ScriptedStore {
    pub fn new(batches: Vec<Retrieval>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            fallback: Retrieval::Empty,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A store that is down for every query
    pub fn unavailable() -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            fallback: Retrieval::Unavailable("Error retrieving documents: connection refused".to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn search(&self, query: &str, _limit: usize) -> Retrieval {
        self.queries.lock().unwrap().push(query.to_string());
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Store double that never answers
pub struct HangingStore;

#[async_trait]
impl DocumentStore for HangingStore {
    async fn search(&self, _query: &str, _limit: usize) -> Retrieval {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Retrieval::Empty
    }
}

/// A batch of `n` chunks tagged with `label`
pub fn batch(label: &str, n: usize) -> Retrieval {
    Retrieval::Found(
        (0..n)
            .map(|i| {
                Chunk::new(
                    format!("{} chunk {}", label, i),
                    Some("policy.pdf".to_string()),
                    Some(i.to_string()),
                )
            })
            .collect(),
    )
}
