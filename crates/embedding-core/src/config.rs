//! Embedding configuration and API credentials.

use anyhow::Result;
use serde::Deserialize;
use std::env;

/// Embedding service configuration. Which provider to use, which model,
/// and optionally a fixed output dimensionality and a separate rerank model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name (e.g. "openai"). Required.
    pub provider: Option<String>,
    /// Embedding model name (e.g. "text-embedding-3-small"). Required.
    /// A provider prefix such as "openai/" is accepted and stripped.
    pub base_model: Option<String>,
    /// Fixed output dimensionality. When absent, providers pick the model's
    /// largest supported dimensionality.
    pub base_dimension: Option<u32>,
    /// Separate reranking model. Not every provider supports one.
    pub rerank_model: Option<String>,
}

impl EmbeddingConfig {
    /// Convenience constructor for an OpenAI model.
    pub fn openai(base_model: impl Into<String>) -> Self {
        Self {
            provider: Some("openai".to_string()),
            base_model: Some(base_model.into()),
            base_dimension: None,
            rerank_model: None,
        }
    }

    /// Sets a fixed output dimensionality.
    pub fn with_dimension(mut self, dimension: u32) -> Self {
        self.base_dimension = Some(dimension);
        self
    }
}

/// API credentials loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    /// API key (OPENAI_EMBEDDING_API_KEY).
    pub api_key: String,
    /// Optional base URL (OPENAI_EMBEDDING_API_BASE). When set, embedding
    /// requests go to this URL instead of the default API endpoint.
    pub base_url: Option<String>,
}

impl ApiCredentials {
    /// Load from environment variables. Missing variables leave the fields
    /// empty; call [`validate`](Self::validate) before use.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_EMBEDDING_API_KEY").unwrap_or_default(),
            base_url: env::var("OPENAI_EMBEDDING_API_BASE")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        }
    }

    /// Validate credentials (the API key is required).
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_EMBEDDING_API_KEY must be set to initialize the embedding provider"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let credentials = ApiCredentials {
            api_key: String::new(),
            base_url: None,
        };
        let err = credentials.validate().unwrap_err();
        assert!(err.to_string().contains("OPENAI_EMBEDDING_API_KEY"));
    }

    #[test]
    fn test_validate_accepts_non_empty_api_key() {
        let credentials = ApiCredentials {
            api_key: "sk-test".to_string(),
            base_url: Some("https://example.com/v1".to_string()),
        };
        assert!(credentials.validate().is_ok());
    }

    #[test]
    fn test_openai_config_builder() {
        let config = EmbeddingConfig::openai("text-embedding-3-small").with_dimension(512);
        assert_eq!(config.provider.as_deref(), Some("openai"));
        assert_eq!(config.base_model.as_deref(), Some("text-embedding-3-small"));
        assert_eq!(config.base_dimension, Some(512));
        assert!(config.rerank_model.is_none());
    }
}
