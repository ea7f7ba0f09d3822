//! Qdrant configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use ca_core::Result;
use ca_core::config::{env_var, parse_or};

/// Connection settings for the Qdrant document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub host: String,
    pub port: u16,
    pub collection: String,
    pub api_key: Option<String>,
    /// Model Qdrant uses to embed query text server side
    pub embedding_model: String,
    /// Named vector to search, for collections created with named vectors
    pub vector_name: Option<String>,
    pub timeout: Duration,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6334,
            collection: "compliance_docs".to_string(),
            api_key: None,
            embedding_model: "sentence-transformers/all-minilm-l6-v2".to_string(),
            vector_name: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl QdrantConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(env_var)
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("QDRANT_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "QDRANT_PORT", defaults.port)?,
            collection: lookup("QDRANT_COLLECTION_NAME").unwrap_or(defaults.collection),
            api_key: lookup("QDRANT_API_KEY"),
            embedding_model: lookup("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            vector_name: lookup("QDRANT_VECTOR_NAME"),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "QDRANT_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
        })
    }

    /// Assembles the endpoint URL from host and port
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
