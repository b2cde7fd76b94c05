//! # OpenAI Embedding Provider
//!
//! This crate implements the [`embedding_core::EmbeddingProvider`] trait against
//! OpenAI's embedding API.
//!
//! ## OpenAIEmbedding
//!
//! Uses OpenAI's embedding models (e.g., `text-embedding-3-small`, `text-embedding-3-large`).
//! Configuration is validated up front: the provider name must be `openai`, the model must
//! be one of the supported models, and a requested output dimensionality must be valid for
//! that model. Oversized input is truncated to the model's token limit before sending, and
//! transient API failures are retried with exponential backoff.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedding_core::{EmbeddingConfig, EmbeddingProvider};
//! use openai_embedding::OpenAIEmbedding;
//!
//! fn create_service() -> Result<OpenAIEmbedding, anyhow::Error> {
//!     // The API key is read from the OPENAI_EMBEDDING_API_KEY environment variable.
//!     let config = EmbeddingConfig::openai("text-embedding-3-small");
//!     OpenAIEmbedding::from_env(&config)
//! }
//!
//! async fn example(service: &OpenAIEmbedding) -> Result<(), anyhow::Error> {
//!     let embedding = service.embed("Hello world").await?;
//!     println!("Embedding dimension: {}", embedding.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! - **API Key**: read from the `OPENAI_EMBEDDING_API_KEY` environment variable (required)
//! - **Base URL**: read from `OPENAI_EMBEDDING_API_BASE` (optional, for OpenAI-compatible endpoints)
//! - **Model**: the embedding model to use; a leading `openai/` prefix is stripped
//! - **Dimension**: optional; defaults to the model's largest supported dimensionality
//!
//! ## Supported Models
//!
//! - `text-embedding-ada-002`: 1536 dimensions (legacy model; the API rejects an explicit
//!   `dimensions` parameter, so none is sent)
//! - `text-embedding-3-small`: 512 or 1536 dimensions
//! - `text-embedding-3-large`: 256, 1024, or 3072 dimensions
//!
//! See [OpenAI Embeddings Documentation](https://platform.openai.com/docs/guides/embeddings)
//! for more details.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_openai::config::OpenAIConfig;
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::CreateEmbeddingRequestArgs;
use async_openai::Client;
use async_trait::async_trait;
use embedding_core::{
    ApiCredentials, ClassifiedError, EmbeddingConfig, EmbeddingProvider, RetryClass, RetryPolicy,
    ScoredChunk,
};
use tracing::{debug, info, instrument, warn};

pub mod blocking;
mod model;
mod tokenizer;

pub use model::{default_dimension, max_input_tokens, tokenizer_id, valid_dimensions};

/// Timeout for a single-text embed request (connect + request + response).
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for a batch request (longer than single embed due to larger payload).
const EMBED_BATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI embedding provider. Holds the async-openai client, the validated
/// model name and output dimensionality, and the retry policy.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: u32,
    retry: RetryPolicy,
}

impl OpenAIEmbedding {
    /// Creates a provider from configuration and credentials, validating both.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the provider is missing or not `"openai"`
    /// - the API key is empty
    /// - a separate rerank model is configured (not supported by this provider)
    /// - the base model is missing or not a supported embedding model
    /// - the requested dimensionality is not valid for the model
    pub fn from_config(config: &EmbeddingConfig, credentials: &ApiCredentials) -> Result<Self> {
        let provider = config
            .provider
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("provider must be set to initialize the OpenAI embedding provider"))?;
        if provider != "openai" {
            anyhow::bail!(
                "the OpenAI embedding provider must be initialized with provider `openai`, got `{provider}`"
            );
        }
        credentials.validate()?;

        if config.rerank_model.is_some() {
            anyhow::bail!("the OpenAI embedding provider does not support a separate rerank model");
        }

        let base_model = config
            .base_model
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("base_model must be set to initialize the OpenAI embedding provider"))?;
        let model = match base_model.rsplit_once('/') {
            Some(("openai", name)) => name,
            _ => base_model,
        };

        let dims = model::valid_dimensions(model)
            .ok_or_else(|| anyhow!("OpenAI embedding model {model} is not supported"))?;
        let dimension = match config.base_dimension {
            Some(d) if dims.contains(&d) => d,
            Some(d) => {
                anyhow::bail!("dimension {d} for {model} is not supported (valid: {dims:?})")
            }
            // Dimension tables are static and non-empty.
            None => *dims.last().expect("model dimension table is empty"),
        };

        let mut openai_config = OpenAIConfig::new().with_api_key(credentials.api_key.clone());
        if let Some(url) = credentials.base_url.as_deref() {
            openai_config = openai_config.with_api_base(url);
        }
        let client = Client::with_config(openai_config);

        Ok(Self {
            client,
            model: model.to_string(),
            dimension,
            retry: RetryPolicy::default(),
        })
    }

    /// Creates a provider reading credentials from `OPENAI_EMBEDDING_API_KEY`
    /// and `OPENAI_EMBEDDING_API_BASE`.
    pub fn from_env(config: &EmbeddingConfig) -> Result<Self> {
        Self::from_config(config, &ApiCredentials::from_env())
    }

    /// Replaces the default retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the validated model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the output dimensionality requests are made with.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// The `dimensions` request parameter; omitted for ada-002, which rejects it.
    fn request_dimensions(&self) -> Option<u32> {
        if self.model == "text-embedding-ada-002" {
            None
        } else {
            Some(self.dimension)
        }
    }

    /// Truncates oversized texts, sends the embeddings request with retry,
    /// and returns the vectors in input order.
    async fn create_embeddings(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let expected = texts.len();
        let timeout = if expected > 1 {
            EMBED_BATCH_TIMEOUT
        } else {
            EMBED_TIMEOUT
        };
        let texts = tokenizer::truncate_to_token_limit(texts, &self.model);

        let response = self
            .retry
            .run(|| {
                let input = texts.clone();
                async move {
                    let mut args = CreateEmbeddingRequestArgs::default();
                    args.model(self.model.clone()).input(input);
                    if let Some(dimensions) = self.request_dimensions() {
                        args.dimensions(dimensions);
                    }
                    let request = args
                        .build()
                        .map_err(|e| ClassifiedError::permanent(anyhow::Error::new(e)))?;

                    let embeddings = self.client.embeddings();
                    let create = embeddings.create(request);
                    match tokio::time::timeout(timeout, create).await {
                        Ok(Ok(response)) => {
                            debug!("OpenAI embeddings response received");
                            Ok(response)
                        }
                        Ok(Err(e)) => {
                            warn!(error = %e, "OpenAI embeddings request failed");
                            Err(classify_error(e))
                        }
                        Err(_) => {
                            warn!(
                                timeout_secs = timeout.as_secs(),
                                "OpenAI embeddings request timed out"
                            );
                            Err(ClassifiedError::transient(anyhow!(
                                "embedding request timed out after {} seconds",
                                timeout.as_secs()
                            )))
                        }
                    }
                }
            })
            .await?;

        // Sort by index so the output order matches the input order.
        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|item| item.embedding).collect();

        if embeddings.len() != expected {
            anyhow::bail!("expected {} embeddings, got {}", expected, embeddings.len());
        }
        Ok(embeddings)
    }
}

/// Maps an API failure to a retry class. Authentication failures get a
/// distinct message naming the environment variable; everything else
/// surfaces as a generic embeddings error.
fn classify_error(err: OpenAIError) -> ClassifiedError {
    let class = match &err {
        OpenAIError::ApiError(api) if is_auth_error(api) => {
            return ClassifiedError::permanent(anyhow!(
                "invalid OpenAI API key provided; check the OPENAI_EMBEDDING_API_KEY environment variable"
            ));
        }
        OpenAIError::ApiError(api) if is_transient_api_error(api) => RetryClass::Transient,
        OpenAIError::Reqwest(_) => RetryClass::Transient,
        _ => RetryClass::Permanent,
    };
    ClassifiedError {
        class,
        error: anyhow::Error::new(err).context("error getting embeddings"),
    }
}

fn is_auth_error(api: &ApiError) -> bool {
    api.code.as_deref() == Some("invalid_api_key")
        || api.r#type.as_deref() == Some("authentication_error")
        || api.message.contains("Incorrect API key")
}

fn is_transient_api_error(api: &ApiError) -> bool {
    api.r#type.as_deref() == Some("server_error")
        || api.code.as_deref() == Some("rate_limit_exceeded")
        || api.message.contains("Rate limit")
        || api.message.contains("overloaded")
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbedding {
    /// Generates an embedding vector for a single text string.
    ///
    /// The text is truncated to the model's input token limit if needed, and
    /// transient API failures are retried per the configured policy.
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        const LOG_PREVIEW_LEN: usize = 200;
        let text_preview = if text.len() <= LOG_PREVIEW_LEN {
            text.to_string()
        } else {
            let safe_len = text
                .char_indices()
                .nth(LOG_PREVIEW_LEN)
                .map(|(idx, _)| idx)
                .unwrap_or(text.len());
            format!("{}...", &text[..safe_len])
        };

        info!(
            model = %self.model,
            text_preview = %text_preview,
            text_len = text.len(),
            "OpenAI embed request"
        );

        let embedding = self
            .create_embeddings(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no embedding in response"))?;

        info!(dimension = embedding.len(), "OpenAI embed done");
        Ok(embedding)
    }

    /// Generates embedding vectors for multiple texts in a single API call.
    ///
    /// Empty input returns an empty result without a network call. The
    /// response must contain exactly one vector per input, in input order.
    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("OpenAI embed_batch empty input, skipping");
            return Ok(vec![]);
        }

        info!(
            model = %self.model,
            batch_size = texts.len(),
            "OpenAI embed_batch request"
        );

        let embeddings = self.create_embeddings(texts.to_vec()).await?;

        let dimension = embeddings.first().map(|v| v.len()).unwrap_or(0);
        info!(
            count = embeddings.len(),
            dimension = dimension,
            "OpenAI embed_batch done"
        );
        Ok(embeddings)
    }

    /// No-op passthrough: this provider has no reranking model, so the first
    /// `limit` results are returned unchanged.
    async fn rerank(
        &self,
        _query: &str,
        mut results: Vec<ScoredChunk>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, anyhow::Error> {
        results.truncate(limit);
        Ok(results)
    }

    /// Tokenizes `text` with the tokenizer belonging to `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if `model` is not a supported embedding model.
    fn tokenize(&self, text: &str, model: &str) -> Result<Vec<u32>, anyhow::Error> {
        tokenizer::tokenize(text, model)
    }
}
