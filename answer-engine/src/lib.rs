//! Answer-synthesis pipeline for the help-desk backend.
//!
//! Public API: [`AnswerEngine`]. Given a question, a category, and
//! optional recent conversation turns, it cascades across the configured
//! provider lanes (remote Hugging Face first when enabled, then local
//! Ollama), parses the winning completion into steps / code samples /
//! verification steps, scores a structural confidence, and — when every
//! lane fails — assembles a deterministic fallback answer enriched from
//! the similarity cache of previously seen questions.
//!
//! Persistence of results is the caller's concern; the engine only
//! returns a [`GenerationResult`] value.

pub mod cfg;
mod confidence;
mod engine;
mod error;
mod fallback;
mod prompt;
mod structure;
pub mod telemetry;
mod types;

pub use cfg::EngineConfig;
pub use engine::AnswerEngine;
pub use error::EngineError;
pub use types::{GenerationMetrics, GenerationResult};

pub use llm_providers::services::{ChatRole, ChatTurn};

/// Answer a single question with an engine built from environment config.
///
/// This is a convenience wrapper for one-shot callers; services should
/// construct one [`AnswerEngine`] and reuse it so the similarity cache
/// accumulates across requests.
///
/// # Example
/// ```no_run
/// # #[tokio::main] async fn main() {
/// let result = answer_engine::answer("How do I reset my password?", "General")
///     .await
///     .unwrap();
/// println!("{}", result.content);
/// # }
/// ```
pub async fn answer(question: &str, category: &str) -> Result<GenerationResult, EngineError> {
    let engine = AnswerEngine::from_env()?;
    engine.generate(question, category, &[]).await
}
