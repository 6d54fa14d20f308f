/// Represents the backend used for answer generation.
///
/// The help-desk pipeline knows two lanes: a local Ollama runtime (the
/// primary, on-device lane) and the remote Hugging Face inference API
/// (the secondary lane, enabled by configuration).
///
/// Adding more providers in the future (e.g. OpenAI, Anthropic) can be
/// done by extending this enum and the [`crate::services::ProviderClient`]
/// facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// Remote Hugging Face inference API.
    HuggingFace,
}

impl LlmProvider {
    /// Short lowercase identifier used in logs and result metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::HuggingFace => "huggingface",
        }
    }
}
