//! Query rewriting step

use std::sync::Arc;

use ca_core::{LlmProvider, Result};

use crate::prompts;
use crate::state::RunState;

/// Output of one rewrite: the new question and the bumped retry counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub question: String,
    pub retry_count: u32,
}

/// Rephrases the question to improve retrieval
#[derive(Clone)]
pub struct Rewriter {
    llm: Arc<dyn LlmProvider>,
}

impl Rewriter {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Rewrite the current question. Only the question is sent to the model.
    ///
    /// The returned `retry_count` is always the state's count plus one; a
    /// blank model reply keeps the old question but still counts.
    pub async fn rewrite(&self, state: &RunState) -> Result<Rewrite> {
        let messages = prompts::rewrite_messages(state.question());
        let result = self.llm.generate(&messages).await?;

        let rewritten = result.text.trim().trim_matches('"').trim();
        let question = if rewritten.is_empty() {
            tracing::warn!("Rewriter returned nothing, keeping the previous question");
            state.question().to_string()
        } else {
            rewritten.to_string()
        };

        tracing::info!(rewritten = %question, "Rewritten query");

        Ok(Rewrite {
            question,
            retry_count: state.retry_count() + 1,
        })
    }
}
