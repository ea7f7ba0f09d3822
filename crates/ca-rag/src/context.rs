//! Rendering retrieved chunks into model context

use ca_core::Chunk;

/// Context handed to the model when a batch holds no chunks
pub const NO_DOCUMENTS_FOUND: &str = "No relevant documents found in the database.";

/// Render one chunk with its provenance
pub fn format_chunk(chunk: &Chunk) -> String {
    format!(
        "--- Document Chunk ---\nSource: {} (Page {})\nContent: {}\n",
        chunk.source, chunk.page, chunk.content
    )
}

/// Join a document batch into a single context blob
pub fn build_context(documents: &[String]) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTS_FOUND.to_string();
    }

    documents.join("\n")
}
