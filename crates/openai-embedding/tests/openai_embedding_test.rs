//! Integration tests for the OpenAI embedding provider.
//!
//! These tests exercise [`openai_embedding::OpenAIEmbedding`] against the real
//! OpenAI embedding API. Tests that call the API are marked `#[ignore]` and
//! require the `OPENAI_EMBEDDING_API_KEY` environment variable (and quota).
//!
//! # Running tests
//!
//! - **Default (no API):** `cargo test -p openai-embedding` — runs only tests that do not call the API.
//! - **With API:** `cargo test -p openai-embedding -- --ignored` — runs ignored tests; set
//!   `OPENAI_EMBEDDING_API_KEY` (e.g. in repo root `.env`). Quota/billing errors are treated as skip, not failure.

use std::path::Path;

use embedding_core::{EmbeddingConfig, EmbeddingProvider};
use openai_embedding::OpenAIEmbedding;

/// Loads `.env` from the workspace root so `OPENAI_EMBEDDING_API_KEY` is available
/// in ignored tests. Path: `crates/openai-embedding` → `../../.env` = repo root.
fn load_root_env() {
    let root_env = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../.env");
    let _ = dotenvy::from_path(root_env);
}

/// Returns true if the error is due to quota/billing/rate-limit; such tests are
/// skipped instead of failed.
fn is_quota_or_billing_error(e: &anyhow::Error) -> bool {
    let s = e.to_string();
    s.contains("insufficient_quota")
        || s.contains("quota")
        || s.contains("billing")
        || s.contains("rate_limit")
}

/// **Test: Single-text embedding (real API).**
///
/// **Setup:** Loads env from workspace root; builds the provider from env with
/// model `text-embedding-3-small` and dimension 512.
///
/// **Action:** Calls `embed("Hello world")`.
///
/// **Expected:** Returns a non-empty embedding vector of length 512. If the error
/// is quota/billing/rate-limit, the test is skipped; otherwise the test fails.
#[tokio::test]
#[ignore] // Requires API key and quota, run with: cargo test -p openai-embedding -- --ignored
async fn test_openai_embedding() {
    load_root_env();
    let config = EmbeddingConfig::openai("text-embedding-3-small").with_dimension(512);
    let service = OpenAIEmbedding::from_env(&config)
        .expect("OPENAI_EMBEDDING_API_KEY must be set for this test (or set in root .env)");

    match service.embed("Hello world").await {
        Ok(embedding) => {
            assert!(!embedding.is_empty());
            assert_eq!(embedding.len(), 512);
        }
        Err(e) if is_quota_or_billing_error(&e) => {
            eprintln!("test_openai_embedding skipped: quota/billing limit ({})", e);
        }
        Err(e) => panic!("OpenAI embed request failed: {}", e),
    }
}

/// **Test: Batch embedding (real API).**
///
/// **Setup:** Same as single-text test; default dimension (1536).
///
/// **Action:** Calls `embed_batch` with three strings: "Hello", "World", "Goodbye".
///
/// **Expected:** Returns exactly three embedding vectors, each non-empty and of
/// length 1536, in input order. Quota/billing errors cause the test to be skipped.
#[tokio::test]
#[ignore]
async fn test_openai_embedding_batch() {
    load_root_env();
    let config = EmbeddingConfig::openai("text-embedding-3-small");
    let service = OpenAIEmbedding::from_env(&config)
        .expect("OPENAI_EMBEDDING_API_KEY must be set for this test (or set in root .env)");

    let texts = vec![
        "Hello".to_string(),
        "World".to_string(),
        "Goodbye".to_string(),
    ];

    match service.embed_batch(&texts).await {
        Ok(embeddings) => {
            assert_eq!(embeddings.len(), 3);
            for embedding in embeddings {
                assert!(!embedding.is_empty());
                assert_eq!(embedding.len(), 1536);
            }
        }
        Err(e) if is_quota_or_billing_error(&e) => {
            eprintln!("test_openai_embedding_batch skipped: quota/billing limit ({})", e);
        }
        Err(e) => panic!("OpenAI embed_batch request failed: {}", e),
    }
}

/// **Test: Oversized input is truncated, not rejected (real API).**
///
/// **Setup:** Provider from env with `text-embedding-3-small`.
///
/// **Action:** Calls `embed` with text far beyond the 8191-token input limit.
///
/// **Expected:** The request succeeds because the input is truncated client-side.
#[tokio::test]
#[ignore]
async fn test_openai_embedding_truncates_oversized_input() {
    load_root_env();
    let config = EmbeddingConfig::openai("text-embedding-3-small");
    let service = OpenAIEmbedding::from_env(&config)
        .expect("OPENAI_EMBEDDING_API_KEY must be set for this test (or set in root .env)");

    let oversized = "token stream ".repeat(20_000);
    match service.embed(&oversized).await {
        Ok(embedding) => assert!(!embedding.is_empty()),
        Err(e) if is_quota_or_billing_error(&e) => {
            eprintln!(
                "test_openai_embedding_truncates_oversized_input skipped: quota/billing limit ({})",
                e
            );
        }
        Err(e) => panic!("OpenAI embed request failed: {}", e),
    }
}

/// **Test: Blocking wrapper (real API).**
///
/// **Setup:** Blocking provider from env with `text-embedding-3-small`.
///
/// **Action:** Calls the synchronous `embed("Hello world")`.
///
/// **Expected:** Returns a non-empty vector of length 1536.
#[test]
#[ignore]
fn test_blocking_openai_embedding() {
    load_root_env();
    let config = EmbeddingConfig::openai("text-embedding-3-small");
    let service = openai_embedding::blocking::OpenAIEmbedding::from_env(&config)
        .expect("OPENAI_EMBEDDING_API_KEY must be set for this test (or set in root .env)");

    match service.embed("Hello world") {
        Ok(embedding) => {
            assert!(!embedding.is_empty());
            assert_eq!(embedding.len(), 1536);
        }
        Err(e) if is_quota_or_billing_error(&e) => {
            eprintln!("test_blocking_openai_embedding skipped: quota/billing limit ({})", e);
        }
        Err(e) => panic!("blocking embed request failed: {}", e),
    }
}
