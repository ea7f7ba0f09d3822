//! Answer generation step

use std::sync::Arc;

use ca_core::{LlmProvider, Result};
use ca_rag::build_context;

use crate::prompts;

/// Answer returned when there is no usable context
pub const INSUFFICIENT_INFORMATION: &str =
    "I could not find enough information in the available documents to answer this question.";

/// Writes the final answer from the question and the last document batch
#[derive(Clone)]
pub struct Generator {
    llm: Arc<dyn LlmProvider>,
}

impl Generator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Never returns an empty answer
    pub async fn generate(&self, question: &str, documents: &[String]) -> Result<String> {
        if documents.is_empty() {
            tracing::warn!("Generating without context");
            return Ok(INSUFFICIENT_INFORMATION.to_string());
        }

        let messages = prompts::generate_messages(question, &build_context(documents));
        let result = self.llm.generate(&messages).await?;

        let answer = result.text.trim();
        if answer.is_empty() {
            return Ok(INSUFFICIENT_INFORMATION.to_string());
        }

        Ok(answer.to_string())
    }
}
