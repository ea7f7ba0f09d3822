//! Plain-text rendering of workflow progress and failures

use ca_agent::{Decision, StepEvent};
use ca_core::{Error, ErrorCategory};

pub const RATE_LIMIT_MESSAGE: &str =
    "Rate Limit Hit: The AI quota is exhausted. Please wait a moment and try again.";

/// One status line per completed step, labelled by the role that ran it
pub fn render_event(event: &StepEvent) -> String {
    match event {
        StepEvent::Retrieved { degraded: true, .. } => {
            "[Retriever] Document store unavailable, continuing without context.".to_string()
        }
        StepEvent::Retrieved { count: 0, .. } => {
            "[Retriever] No relevant chunks found.".to_string()
        }
        StepEvent::Retrieved { count, .. } => {
            format!("[Retriever] Found {} relevant chunk(s).", count)
        }
        StepEvent::Graded {
            grade,
            decision: Decision::Generate,
        } => format!("[Auditor] Documents are {}. Drafting answer.", grade),
        StepEvent::Graded {
            grade,
            decision: Decision::Rewrite,
        } => format!("[Auditor] Documents are {}. Requesting query rewrite.", grade),
        StepEvent::Rewritten {
            question,
            retry_count,
        } => format!("[Query Refiner] New Query (attempt {}): '{}'", retry_count, question),
        StepEvent::Generated { .. } => "[Writer] Answer ready.".to_string(),
    }
}

/// User-facing text for a failed run
pub fn failure_message(error: &Error) -> String {
    match error.category() {
        ErrorCategory::QuotaExhausted => RATE_LIMIT_MESSAGE.to_string(),
        ErrorCategory::Timeout => format!("Timed Out: {}", error),
        ErrorCategory::Configuration => format!("Configuration Error: {}", error),
        ErrorCategory::Generic => format!("System Error: {}", error),
    }
}
