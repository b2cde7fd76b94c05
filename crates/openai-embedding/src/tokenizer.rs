//! Tokenization and token-limit truncation for the supported models.

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use tiktoken_rs::CoreBPE;

use crate::model;

static CL100K: OnceLock<CoreBPE> = OnceLock::new();

/// Returns the shared cl100k_base encoding, building it on first use.
fn cl100k_base() -> Result<&'static CoreBPE> {
    if let Some(bpe) = CL100K.get() {
        return Ok(bpe);
    }
    let bpe = tiktoken_rs::cl100k_base()?;
    Ok(CL100K.get_or_init(|| bpe))
}

fn encoding_for(model: &str) -> Result<&'static CoreBPE> {
    match model::tokenizer_id(model) {
        Some("cl100k_base") => cl100k_base(),
        Some(other) => Err(anyhow!("unknown tokenizer {other} for model {model}")),
        None => Err(anyhow!("OpenAI embedding model {model} is not supported")),
    }
}

/// Tokenizes `text` with the tokenizer belonging to `model`.
pub fn tokenize(text: &str, model: &str) -> Result<Vec<u32>> {
    let bpe = encoding_for(model)?;
    Ok(bpe.encode_with_special_tokens(text))
}

/// Truncates each text to the model's input token limit. Texts already
/// within the limit pass through untouched; tokenizer failures leave the
/// text unchanged (the API then reports the oversized input itself).
pub fn truncate_to_token_limit(texts: Vec<String>, model: &str) -> Vec<String> {
    let Some(limit) = model::max_input_tokens(model) else {
        return texts;
    };
    let Ok(bpe) = encoding_for(model) else {
        return texts;
    };
    texts
        .into_iter()
        .map(|text| {
            let tokens = bpe.encode_with_special_tokens(&text);
            if tokens.len() <= limit {
                return text;
            }
            match bpe.decode(tokens[..limit].to_vec()) {
                Ok(truncated) => truncated,
                Err(_) => text,
            }
        })
        .collect()
}
