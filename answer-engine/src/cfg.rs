//! Engine configuration resolved from environment variables.

use llm_providers::config::default_config;
use llm_providers::{LlmError, LlmModelConfig};

/// Default similarity threshold for fallback enrichment lookups.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Config bag for the answer engine. All fields have defaults via
/// [`EngineConfig::from_env`]; tests and embedders may also build one
/// directly.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Primary (local Ollama) lane config.
    pub ollama: LlmModelConfig,

    /// Secondary (remote Hugging Face) lane config; `None` disables the
    /// lane. When present, the remote lane is tried first.
    pub huggingface: Option<LlmModelConfig>,

    /// Maximum number of distinct questions kept in the similarity cache.
    pub cache_capacity: usize,

    /// Minimum cosine similarity for fallback enrichment matches.
    pub similarity_threshold: f32,
}

impl EngineConfig {
    /// Builds the config from environment variables with defaults.
    ///
    /// Knobs beyond the lane configs:
    /// - `CACHE_CAPACITY` (default 1000)
    /// - `SIMILARITY_THRESHOLD` (default 0.5)
    ///
    /// # Errors
    /// Propagates [`LlmError`] for malformed lane variables.
    pub fn from_env() -> Result<Self, LlmError> {
        Ok(Self {
            ollama: default_config::config_ollama_chat()?,
            huggingface: default_config::config_huggingface()?,
            cache_capacity: parse("CACHE_CAPACITY", semantic_cache::DEFAULT_CAPACITY),
            similarity_threshold: parse("SIMILARITY_THRESHOLD", DEFAULT_SIMILARITY_THRESHOLD),
        })
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
