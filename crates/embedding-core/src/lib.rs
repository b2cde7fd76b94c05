//! # Embedding Core
//!
//! This crate defines the embedding provider interface shared by concrete
//! provider implementations, along with the pieces every provider needs:
//! configuration, API credentials, a generic retry policy, and the chunk
//! type reranking operates on.

use async_trait::async_trait;

mod config;
mod retry;
mod types;

pub use config::{ApiCredentials, EmbeddingConfig};
pub use retry::{ClassifiedError, RetryClass, RetryPolicy};
pub use types::ScoredChunk;


/// Provider of text embeddings and (optional) reranking.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Generates embedding vectors for multiple texts in a single API call.
    /// This is more efficient than calling `embed` multiple times. Results
    /// are returned in input order, one vector per input.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;

    /// Reorders `results` by relevance to `query` and returns at most `limit`
    /// of them. Providers without a reranking model return the first `limit`
    /// results unchanged.
    async fn rerank(
        &self,
        query: &str,
        results: Vec<ScoredChunk>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, anyhow::Error>;

    /// Tokenizes `text` with the tokenizer belonging to `model`.
    fn tokenize(&self, text: &str, model: &str) -> Result<Vec<u32>, anyhow::Error>;
}
