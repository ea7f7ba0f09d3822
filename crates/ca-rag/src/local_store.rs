//! In-memory document store

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use ca_core::{Chunk, DocumentStore, Retrieval};

/// Keyword-overlap store for offline runs and tests
#[derive(Clone, Default)]
pub struct LocalDocumentStore {
    chunks: Arc<RwLock<Vec<Chunk>>>,
}

impl LocalDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunks(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks: Arc::new(RwLock::new(chunks)),
        }
    }

    pub fn add(&self, chunk: Chunk) {
        match self.chunks.write() {
            Ok(mut chunks) => chunks.push(chunk),
            Err(poisoned) => poisoned.into_inner().push(chunk),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fraction of query words found in the content
    fn text_similarity(query: &str, content: &str) -> f32 {
        let query_lower = query.to_lowercase();
        let content_lower = content.to_lowercase();

        let query_words: Vec<&str> = query_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .collect();

        if query_words.is_empty() {
            return 0.0;
        }

        let matches = query_words
            .iter()
            .filter(|word| content_lower.contains(*word))
            .count();

        matches as f32 / query_words.len() as f32
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn search(&self, query: &str, limit: usize) -> Retrieval {
        let chunks = match self.chunks.read() {
            Ok(chunks) => chunks,
            Err(e) => return Retrieval::Unavailable(format!("Lock error: {}", e)),
        };

        let mut scored: Vec<(f32, &Chunk)> = chunks
            .iter()
            .map(|chunk| (Self::text_similarity(query, &chunk.content), chunk))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(limit);

        Retrieval::from_chunks(scored.into_iter().map(|(_, c)| c.clone()).collect())
    }
}
