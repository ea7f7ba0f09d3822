//! Document store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const UNKNOWN_PAGE: &str = "Unknown Page";

/// A retrieved span of source-document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub source: String,
    pub page: String,
}

impl Chunk {
    pub fn new(
        content: impl Into<String>,
        source: Option<String>,
        page: Option<String>,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            page: page.unwrap_or_else(|| UNKNOWN_PAGE.to_string()),
        }
    }
}

/// Outcome of a store query, already converted at the store boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Retrieval {
    Found(Vec<Chunk>),
    Empty,
    /// The store could not be queried; carries the error description
    Unavailable(String),
}

impl Retrieval {
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        if chunks.is_empty() {
            Retrieval::Empty
        } else {
            Retrieval::Found(chunks)
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Retrieval::Unavailable(_))
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        match self {
            Retrieval::Found(chunks) => chunks,
            Retrieval::Empty | Retrieval::Unavailable(_) => Vec::new(),
        }
    }
}

/// Trait for ranked text search over ingested documents (e.g., Qdrant)
///
/// `search` has no error channel: connectivity and query failures must be
/// reported as [`Retrieval::Unavailable`] so the workflow never aborts on a
/// store fault.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Retrieval;
}
