use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM generation lane.
///
/// The same struct is used for both providers; provider-specific fields
/// (e.g. `api_key`) are simply ignored by backends that do not need them.
///
/// # Examples
///
/// ```
/// use llm_providers::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "mistral".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     api_key: None,
///     max_tokens: Some(512),
///     temperature: Some(0.7),
///     top_p: Some(0.9),
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.provider, LlmProvider::Ollama);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The provider/backend this config addresses.
    pub provider: LlmProvider,

    /// Model identifier string (e.g. `"mistral"`, `"tiiuae/falcon-7b-instruct"`).
    pub model: String,

    /// Inference endpoint (local server URL or remote API base URL).
    pub endpoint: String,

    /// Optional API key for authentication (required by Hugging Face).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}
