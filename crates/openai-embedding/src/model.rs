//! Static model tables: tokenizer ids, valid output dimensionalities, and
//! input token limits for the supported OpenAI embedding models.

/// Tokenizer id for a supported model, `None` for unsupported models.
pub fn tokenizer_id(model: &str) -> Option<&'static str> {
    match model {
        "text-embedding-ada-002" | "text-embedding-3-small" | "text-embedding-3-large" => {
            Some("cl100k_base")
        }
        _ => None,
    }
}

/// Valid output dimensionalities for a supported model, sorted ascending.
pub fn valid_dimensions(model: &str) -> Option<&'static [u32]> {
    match model {
        "text-embedding-ada-002" => Some(&[1536]),
        "text-embedding-3-small" => Some(&[512, 1536]),
        "text-embedding-3-large" => Some(&[256, 1024, 3072]),
        _ => None,
    }
}

/// Largest supported dimensionality, used when no dimension is configured.
pub fn default_dimension(model: &str) -> Option<u32> {
    valid_dimensions(model).and_then(|dims| dims.last().copied())
}

/// Maximum number of input tokens the model accepts per text.
pub fn max_input_tokens(model: &str) -> Option<usize> {
    // All three supported models share the same input limit.
    tokenizer_id(model).map(|_| 8191)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_models_have_tables() {
        for model in [
            "text-embedding-ada-002",
            "text-embedding-3-small",
            "text-embedding-3-large",
        ] {
            assert_eq!(tokenizer_id(model), Some("cl100k_base"));
            assert!(valid_dimensions(model).is_some());
            assert_eq!(max_input_tokens(model), Some(8191));
        }
    }

    #[test]
    fn test_unknown_model_has_no_tables() {
        assert_eq!(tokenizer_id("gpt-4"), None);
        assert_eq!(valid_dimensions("gpt-4"), None);
        assert_eq!(max_input_tokens("gpt-4"), None);
    }

    #[test]
    fn test_default_dimension_is_largest() {
        assert_eq!(default_dimension("text-embedding-ada-002"), Some(1536));
        assert_eq!(default_dimension("text-embedding-3-small"), Some(1536));
        assert_eq!(default_dimension("text-embedding-3-large"), Some(3072));
    }
}
