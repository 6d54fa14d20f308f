//! Public result types returned by the answer engine.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Structured answer produced for one question.
///
/// `content` is never empty: when every provider fails, the fallback path
/// supplies it. `confidence` is always within `[0, 1]`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// The answer text shown to the user.
    pub content: String,
    /// Confidence estimate in `[0, 1]`.
    pub confidence: f32,
    /// Numbered resolution steps found in the answer, in document order.
    pub steps: Vec<String>,
    /// Fenced code blocks found in the answer, in document order.
    pub code_samples: Vec<String>,
    /// Verification-step fragments found in the answer.
    pub verification_steps: Vec<String>,
    /// Whether the answer should be routed to a human agent.
    pub needs_human: bool,
    /// Provenance and size facts about this answer.
    pub metrics: GenerationMetrics,
    /// When this result was assembled.
    pub created_at: DateTime<Utc>,
}

/// Provenance and size facts for one generated answer.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationMetrics {
    /// Which lane produced the answer (`"ollama"`, `"huggingface"`, `"fallback"`).
    pub provider: String,
    /// Model identifier the lane was configured with.
    pub model: String,
    /// Content length in characters.
    pub length: usize,
    /// Whether the answer came from the degraded fallback path.
    pub is_fallback: bool,
    /// Whether the fallback found similar previously-seen questions.
    pub has_similar_cases: bool,
}
