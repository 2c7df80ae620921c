use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A loaded corpus file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path the document was read from, as given to the loader
    pub source: String,
    pub content: String,
}

/// A single chunk of a document, the unit that gets embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub source: String,
    /// Char offset of the chunk within its document
    pub start_index: usize,
    pub content: String,
}

/// Query request
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Query response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub answer: String,
    /// Source files of the retrieved chunks, first occurrence order
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// A single chat turn sent to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
