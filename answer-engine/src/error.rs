//! Typed error for the answer-engine crate.

use thiserror::Error;

/// Errors visible to callers of the engine.
///
/// Provider and cache failures are recovered internally and never appear
/// here; the only runtime variant is [`EngineError::Unavailable`], raised
/// when even the fallback path could not produce usable content.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Lane configuration/validation failed while building the engine.
    #[error("provider configuration error: {0}")]
    Config(#[from] llm_providers::LlmError),

    /// The always-succeeds fallback produced no usable content. This
    /// indicates a bug rather than an environmental condition and is the
    /// one case surfaced as a service-unavailable signal.
    #[error("service temporarily unavailable, please try again later")]
    Unavailable,
}
