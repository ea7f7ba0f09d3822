//! Relevance grading step

use serde::Deserialize;
use std::sync::Arc;

use ca_core::{LlmProvider, Result};
use ca_rag::build_context;

use crate::prompts;
use crate::state::Grade;

#[derive(Deserialize)]
struct GradeDocuments {
    binary_score: String,
}

/// Judges whether a document batch is relevant to the question
#[derive(Clone)]
pub struct Grader {
    llm: Arc<dyn LlmProvider>,
}

impl Grader {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Grade the batch. An empty batch is irrelevant without asking the model.
    pub async fn grade(&self, question: &str, documents: &[String]) -> Result<Grade> {
        if documents.is_empty() {
            tracing::warn!("No usable context to grade, treating batch as irrelevant");
            return Ok(Grade::Irrelevant);
        }

        let messages = prompts::grade_messages(question, &build_context(documents));
        let result = self
            .llm
            .generate_structured(&messages, prompts::grade_schema())
            .await?;

        let grade = parse_grade(&result.text);
        tracing::info!(%grade, raw = %result.text, "Judge decision");
        Ok(grade)
    }
}

/// Map raw grader output to a grade
///
/// Accepts the structured `{"binary_score": ...}` object (optionally wrapped
/// in prose or a code fence) or a bare yes/no. Anything else fails closed
/// to [`Grade::Irrelevant`].
pub fn parse_grade(raw: &str) -> Grade {
    let score = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str::<GradeDocuments>(&raw[start..=end])
                .map(|g| g.binary_score)
                .ok()
        }
        _ => Some(raw.to_string()),
    };

    let normalized = score
        .as_deref()
        .map(|s| {
            s.trim()
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .unwrap_or_default();

    match normalized.as_str() {
        "yes" => Grade::Relevant,
        "no" => Grade::Irrelevant,
        _ => {
            tracing::warn!(raw, "Malformed grader output, defaulting to irrelevant");
            Grade::Irrelevant
        }
    }
}
