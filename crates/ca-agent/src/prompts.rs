//! Role-specific instruction templates
//!
//! Each model-backed step has its own system instruction. The user message
//! carries the run state fields the step is allowed to see.

use ca_core::Message;
use serde_json::json;

pub const GRADE_SYSTEM: &str = "You are a strict compliance auditor assessing the relevance of \
retrieved documents to a user question. If the documents contain keyword(s) or semantic meaning \
related to the user question, grade them as relevant. Give a binary score 'yes' or 'no'.";

pub const REWRITE_SYSTEM: &str = "You are a query rewriter that converts an input question to a \
better version that is optimized for vector retrieval. Look at the initial question and reason \
about its underlying semantic intent. Reply with the improved question only.";

pub const GENERATE_SYSTEM: &str = "You are an assistant for question-answering tasks. Use the \
following pieces of retrieved context to answer the question. If you don't know the answer, just \
say that you don't know. Keep the answer concise.";

pub fn grade_messages(question: &str, context: &str) -> Vec<Message> {
    vec![
        Message::system(GRADE_SYSTEM),
        Message::user(format!(
            "Retrieved document: \n\n {} \n\n User question: {}",
            context, question
        )),
    ]
}

/// Response schema for the grading request
pub fn grade_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "binary_score": {
                "type": "STRING",
                "enum": ["yes", "no"],
                "description": "Documents are relevant to the question, 'yes' or 'no'"
            }
        },
        "required": ["binary_score"]
    })
}

pub fn rewrite_messages(question: &str) -> Vec<Message> {
    vec![
        Message::system(REWRITE_SYSTEM),
        Message::user(format!(
            "Initial Question: {} \n Formulate an improved question.",
            question
        )),
    ]
}

pub fn generate_messages(question: &str, context: &str) -> Vec<Message> {
    vec![
        Message::system(GENERATE_SYSTEM),
        Message::user(format!(
            "Question: {}\nContext: {}\n\nAnswer:",
            question, context
        )),
    ]
}
