//! Per-run workflow state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use ca_core::{Error, Result};

use crate::rewriter::Rewrite;

/// Relevance judgment for the current document batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Relevant,
    Irrelevant,
    /// No judgment for the current batch yet
    Unknown,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::Relevant => "relevant",
            Grade::Irrelevant => "irrelevant",
            Grade::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "relevant" | "yes" => Ok(Grade::Relevant),
            "irrelevant" | "no" => Ok(Grade::Irrelevant),
            "unknown" => Ok(Grade::Unknown),
            other => Err(Error::InvalidInput(format!("unknown grade '{}'", other))),
        }
    }
}

/// The record threaded through one workflow execution
///
/// Fields are only mutated through the `apply_*` methods, each owned by a
/// single step: Retrieve replaces `documents`, Grade sets `grade`, Rewrite
/// sets `question` and `retry_count`, Generate sets `generation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunState {
    question: String,
    documents: Vec<String>,
    generation: String,
    grade: Grade,
    retry_count: u32,
    #[serde(skip)]
    retrieved: bool,
}

impl RunState {
    /// Fresh state for a new question
    pub fn new(question: impl Into<String>) -> Result<Self> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(Error::InvalidInput("question must not be empty".to_string()));
        }

        Ok(Self {
            question: question.trim().to_string(),
            documents: Vec::new(),
            generation: String::new(),
            grade: Grade::Unknown,
            retry_count: 0,
            retrieved: false,
        })
    }

    /// Start a run for `question`, given the caller's prior state
    ///
    /// A new question always gets a fresh state and a full retry budget.
    /// Only an unfinished run for the same question keeps its `retry_count`.
    /// Documents, answer and grade always start over.
    pub fn resume(prior: RunState, question: impl Into<String>) -> Result<Self> {
        let mut state = Self::new(question)?;
        if prior.generation.is_empty() && prior.question == state.question {
            state.retry_count = prior.retry_count;
        }
        Ok(state)
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Whether at least one Retrieve step has run
    pub fn has_retrieved(&self) -> bool {
        self.retrieved
    }

    pub(crate) fn apply_retrieval(&mut self, documents: Vec<String>) {
        self.documents = documents;
        self.retrieved = true;
    }

    pub(crate) fn apply_grade(&mut self, grade: Grade) {
        self.grade = grade;
    }

    /// Install a rewritten question. The grade refers to the previous
    /// batch afterwards, so it is reset until the next Grade step.
    pub(crate) fn apply_rewrite(&mut self, rewrite: Rewrite) {
        debug_assert_eq!(rewrite.retry_count, self.retry_count + 1);
        self.question = rewrite.question;
        self.retry_count = rewrite.retry_count;
        self.grade = Grade::Unknown;
    }

    pub(crate) fn apply_generation(&mut self, generation: String) {
        self.generation = generation;
    }
}
