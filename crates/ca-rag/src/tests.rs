//! Tests for document store components

#[cfg(test)]
mod store_tests {
    use crate::qdrant_store::chunk_from_payload;
    use crate::{
        Chunk, DocumentStore, LocalDocumentStore, NO_DOCUMENTS_FOUND, QdrantConfig,
        QdrantDocumentStore, Retrieval, build_context, format_chunk,
    };
    use insta::assert_snapshot;
    use qdrant_client::qdrant::value::Kind;
    use qdrant_client::qdrant::{Struct, Value};
    use std::collections::HashMap;
    use std::time::Duration;

    fn string_value(s: &str) -> Value {
        Value {
            kind: Some(Kind::StringValue(s.to_string())),
        }
    }

    fn policy_store() -> LocalDocumentStore {
        LocalDocumentStore::with_chunks(vec![
            Chunk::new(
                "Employees may work remotely up to three days per week with manager approval.",
                Some("policy.pdf".to_string()),
                Some("3".to_string()),
            ),
            Chunk::new(
                "Travel spending above 500 EUR requires prior approval.",
                Some("policy.pdf".to_string()),
                Some("7".to_string()),
            ),
            Chunk::new(
                "Remote work equipment is reimbursed once per year.",
                Some("handbook.pdf".to_string()),
                Some("12".to_string()),
            ),
        ])
    }

    #[tokio::test]
    async fn test_local_store_ranks_by_overlap() {
        let store = policy_store();
        let retrieval = store.search("What is the remote work policy?", 2).await;

        let chunks = retrieval.into_chunks();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.content.to_lowercase().contains("remote")));
    }

    #[tokio::test]
    async fn test_local_store_empty_result_is_not_an_error() {
        let store = policy_store();
        let retrieval = store.search("quantum chromodynamics", 3).await;
        assert_eq!(retrieval, Retrieval::Empty);
    }

    #[tokio::test]
    async fn test_local_store_respects_limit() {
        let store = LocalDocumentStore::new();
        assert!(store.is_empty());
        for i in 0..5 {
            store.add(Chunk::new(format!("approval rule {}", i), None, None));
        }
        assert_eq!(store.len(), 5);

        let retrieval = store.search("approval", 3).await;
        assert_eq!(retrieval.into_chunks().len(), 3);
    }

    #[tokio::test]
    async fn test_unreachable_qdrant_degrades() {
        let config = QdrantConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            timeout: Duration::from_millis(500),
            ..Default::default()
        };
        let store = QdrantDocumentStore::new(config).unwrap();

        match store.search("remote work", 3).await {
            Retrieval::Unavailable(detail) => {
                assert!(detail.starts_with("Error retrieving documents"))
            }
            other => panic!("expected degraded retrieval, got {:?}", other),
        }
    }

    #[test]
    fn test_chunk_from_top_level_payload() {
        let mut payload = HashMap::new();
        payload.insert("document".to_string(), string_value("Remote work is allowed."));
        payload.insert("source".to_string(), string_value("data/raw_pdfs/policy.pdf"));
        payload.insert(
            "page".to_string(),
            Value {
                kind: Some(Kind::IntegerValue(4)),
            },
        );

        let chunk = chunk_from_payload(payload).unwrap();
        assert_eq!(chunk.content, "Remote work is allowed.");
        assert_eq!(chunk.source, "data/raw_pdfs/policy.pdf");
        assert_eq!(chunk.page, "4");
    }

    #[test]
    fn test_chunk_from_nested_metadata() {
        let mut fields = HashMap::new();
        fields.insert("source".to_string(), string_value("handbook.pdf"));

        let mut payload = HashMap::new();
        payload.insert("page_content".to_string(), string_value("Laptops are provided."));
        payload.insert(
            "metadata".to_string(),
            Value {
                kind: Some(Kind::StructValue(Struct { fields })),
            },
        );

        let chunk = chunk_from_payload(payload).unwrap();
        assert_eq!(chunk.source, "handbook.pdf");
        assert_eq!(chunk.page, "Unknown Page");
    }

    #[test]
    fn test_chunk_without_text_is_skipped() {
        let mut payload = HashMap::new();
        payload.insert("source".to_string(), string_value("policy.pdf"));
        assert!(chunk_from_payload(payload).is_none());
    }

    #[test]
    fn test_config_defaults_allow_local_operation() {
        let config = QdrantConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.url(), "http://localhost:6334");
        assert_eq!(config.collection, "compliance_docs");
        assert!(config.api_key.is_none());

        let config = QdrantConfig::from_lookup(|key| match key {
            "QDRANT_HOST" => Some("qdrant".to_string()),
            "QDRANT_PORT" => Some("7334".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.url(), "http://qdrant:7334");

        assert!(
            QdrantConfig::from_lookup(|key| (key == "QDRANT_PORT").then(|| "http".to_string()))
                .is_err()
        );
    }

    #[test]
    fn test_context_formatting() {
        let chunk = Chunk::new(
            "Employees may work remotely.",
            Some("policy.pdf".to_string()),
            Some("3".to_string()),
        );
        let documents = vec![format_chunk(&chunk), format_chunk(&chunk)];

        assert_snapshot!(build_context(&documents), @r###"
        --- Document Chunk ---
        Source: policy.pdf (Page 3)
        Content: Employees may work remotely.

        --- Document Chunk ---
        Source: policy.pdf (Page 3)
        Content: Employees may work remotely.
        "###);
        assert_eq!(build_context(&[]), NO_DOCUMENTS_FOUND);
    }
}
