//! Qdrant document store

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{Document, Query, QueryPointsBuilder, Value};
use std::collections::HashMap;

use ca_core::{Chunk, DocumentStore, Error, Result, Retrieval};

use crate::config::QdrantConfig;

/// Payload keys the chunk text may be stored under, in lookup order
const CONTENT_KEYS: [&str; 3] = ["document", "content", "page_content"];

/// Document store backed by a Qdrant collection
///
/// Query text is embedded by Qdrant itself through server-side inference,
/// so this type never computes vectors.
pub struct QdrantDocumentStore {
    client: Qdrant,
    config: QdrantConfig,
}

impl QdrantDocumentStore {
    /// Create a store for the configured collection
    pub fn new(config: QdrantConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url())
            .api_key(config.api_key.clone())
            .timeout(config.timeout)
            .skip_compatibility_check()
            .build()
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a store from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(QdrantConfig::from_env()?)
    }

    async fn query(&self, query: &str, limit: usize) -> Result<Vec<Chunk>> {
        let mut request = QueryPointsBuilder::new(self.config.collection.clone())
            .query(Query::new_nearest(Document::new(
                query,
                self.config.embedding_model.clone(),
            )))
            .with_payload(true)
            .limit(limit as u64);

        if let Some(vector_name) = &self.config.vector_name {
            request = request.using(vector_name.clone());
        }

        let response = self
            .client
            .query(request)
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| chunk_from_payload(point.payload))
            .collect())
    }
}

#[async_trait]
impl DocumentStore for QdrantDocumentStore {
    async fn search(&self, query: &str, limit: usize) -> Retrieval {
        tracing::info!(query, limit, collection = %self.config.collection, "Searching Qdrant");

        let outcome = tokio::time::timeout(self.config.timeout, self.query(query, limit)).await;

        match outcome {
            Ok(Ok(chunks)) if chunks.is_empty() => {
                tracing::warn!(query, "No documents found for query");
                Retrieval::Empty
            }
            Ok(Ok(chunks)) => {
                tracing::info!(count = chunks.len(), "Retrieved documents successfully");
                Retrieval::Found(chunks)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Error querying Qdrant");
                Retrieval::Unavailable(format!("Error retrieving documents: {}", e))
            }
            Err(_) => {
                tracing::error!(timeout = ?self.config.timeout, "Qdrant query timed out");
                Retrieval::Unavailable(format!(
                    "Error retrieving documents: query timed out after {:?}",
                    self.config.timeout
                ))
            }
        }
    }
}

/// Build a chunk from a point payload
///
/// Metadata is read from top-level keys first, then from a nested
/// `metadata` object. Points without any text are skipped.
pub(crate) fn chunk_from_payload(payload: HashMap<String, Value>) -> Option<Chunk> {
    let nested = match payload.get("metadata").and_then(|v| v.kind.as_ref()) {
        Some(Kind::StructValue(s)) => s.fields.clone(),
        _ => HashMap::new(),
    };

    let lookup = |key: &str| {
        payload
            .get(key)
            .and_then(value_to_string)
            .or_else(|| nested.get(key).and_then(value_to_string))
    };

    let content = CONTENT_KEYS.iter().find_map(|key| lookup(*key))?;
    Some(Chunk::new(content, lookup("source"), lookup("page")))
}

fn value_to_string(value: &Value) -> Option<String> {
    match value.kind.as_ref()? {
        Kind::StringValue(s) => Some(s.clone()),
        Kind::IntegerValue(i) => Some(i.to_string()),
        Kind::DoubleValue(d) => Some(d.to_string()),
        Kind::BoolValue(b) => Some(b.to_string()),
        _ => None,
    }
}
