//! Blocking wrapper over the async provider.
//!
//! Owns a current-thread tokio runtime and blocks on the async calls, for
//! callers without an async context. Not for use inside an async runtime.

use anyhow::{Context, Result};
use embedding_core::{ApiCredentials, EmbeddingConfig, EmbeddingProvider, ScoredChunk};

/// Blocking OpenAI embedding provider.
pub struct OpenAIEmbedding {
    inner: crate::OpenAIEmbedding,
    runtime: tokio::runtime::Runtime,
}

impl OpenAIEmbedding {
    /// Creates a blocking provider; validation matches the async constructor.
    pub fn from_config(config: &EmbeddingConfig, credentials: &ApiCredentials) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build runtime for blocking embedding provider")?;
        Ok(Self {
            inner: crate::OpenAIEmbedding::from_config(config, credentials)?,
            runtime,
        })
    }

    /// Creates a blocking provider reading credentials from the environment.
    pub fn from_env(config: &EmbeddingConfig) -> Result<Self> {
        Self::from_config(config, &ApiCredentials::from_env())
    }

    /// Generates an embedding vector for a single text string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.runtime.block_on(self.inner.embed(text))
    }

    /// Generates embedding vectors for multiple texts in a single API call.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.runtime.block_on(self.inner.embed_batch(texts))
    }

    /// No-op passthrough, same as the async provider.
    pub fn rerank(
        &self,
        query: &str,
        results: Vec<ScoredChunk>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>> {
        self.runtime.block_on(self.inner.rerank(query, results, limit))
    }

    /// Tokenizes `text` with the tokenizer belonging to `model`.
    pub fn tokenize(&self, text: &str, model: &str) -> Result<Vec<u32>> {
        self.inner.tokenize(text, model)
    }

    /// Returns the validated model name.
    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Returns the output dimensionality requests are made with.
    pub fn dimension(&self) -> u32 {
        self.inner.dimension()
    }
}
