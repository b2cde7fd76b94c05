//! Shared types crossing the provider boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A retrieved chunk of text with its relevance score, as produced by a
/// vector search and consumed by reranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Unique identifier of the chunk.
    pub id: Uuid,
    /// The chunk text.
    pub text: String,
    /// Relevance score (higher is more relevant).
    pub score: f32,
}

impl ScoredChunk {
    /// Creates a chunk with a fresh id.
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            score,
        }
    }
}
