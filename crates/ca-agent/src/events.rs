//! Step identifiers and the progress events emitted after each step

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::Decision;
use crate::state::Grade;

/// Workflow states between START and END
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Retrieve,
    Grade,
    Rewrite,
    Generate,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Retrieve => "retrieve",
            Step::Grade => "grade",
            Step::Rewrite => "rewrite",
            Step::Generate => "generate",
        };
        f.write_str(label)
    }
}

/// Emitted once a step has completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepEvent {
    Retrieved { count: usize, degraded: bool },
    Graded { grade: Grade, decision: Decision },
    Rewritten { question: String, retry_count: u32 },
    Generated { answer: String },
}

impl StepEvent {
    pub fn step(&self) -> Step {
        match self {
            StepEvent::Retrieved { .. } => Step::Retrieve,
            StepEvent::Graded { .. } => Step::Grade,
            StepEvent::Rewritten { .. } => Step::Rewrite,
            StepEvent::Generated { .. } => Step::Generate,
        }
    }
}
