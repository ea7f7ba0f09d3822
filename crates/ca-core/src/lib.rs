//! Core traits and types for the compliance agent
//!
//! This crate defines the seams the rest of the workspace is built on: the
//! language-model boundary, the document store boundary, and the shared
//! error taxonomy. Keeping them here makes every workflow step mockable.

pub mod config;
pub mod document_store;
pub mod error;
pub mod llm;

pub use document_store::{Chunk, DocumentStore, Retrieval, UNKNOWN_PAGE, UNKNOWN_SOURCE};
pub use error::{Error, ErrorCategory, Result};
pub use llm::{DEFAULT_MODEL, GenerationConfig, GenerationResult, LlmProvider, Message, Role};
