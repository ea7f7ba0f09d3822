//! Self-correcting retrieval workflow for the compliance agent
//!
//! The [`Orchestrator`] runs a small state machine over one [`RunState`]:
//!
//! ```text
//! START -> RETRIEVE -> GRADE -> GENERATE -> END
//!                        |
//!                        +--> REWRITE -> RETRIEVE
//! ```
//!
//! The branch after GRADE is chosen by the [`DecisionPolicy`], which caps
//! the number of rewrite cycles so every run ends in GENERATE.

mod config;
mod events;
mod generator;
mod grader;
mod policy;
pub mod prompts;
mod rewriter;
mod state;
mod workflow;

#[cfg(test)]
mod testing;

pub use config::AgentConfig;
pub use events::{Step, StepEvent};
pub use generator::{Generator, INSUFFICIENT_INFORMATION};
pub use grader::{Grader, parse_grade};
pub use policy::{Decision, DecisionPolicy};
pub use rewriter::{Rewrite, Rewriter};
pub use state::{Grade, RunState};
pub use workflow::Orchestrator;

// Re-export core types for convenience
pub use ca_core::{DocumentStore, Error, ErrorCategory, LlmProvider, Result, Retrieval};
