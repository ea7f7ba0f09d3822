//! Document store implementations for the compliance agent
//!
//! This crate provides the Qdrant-backed store used in production, an
//! in-memory store for offline runs, and the context formatting shared by
//! the workflow steps.

mod config;
mod context;
mod local_store;
mod qdrant_store;

#[cfg(test)]
mod tests;

pub use config::QdrantConfig;
pub use context::{NO_DOCUMENTS_FOUND, build_context, format_chunk};
pub use local_store::LocalDocumentStore;
pub use qdrant_store::QdrantDocumentStore;

// Re-export core types for convenience
pub use ca_core::{Chunk, DocumentStore, Error, Result, Retrieval};
