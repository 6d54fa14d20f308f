//! Deterministic fallback answer used when every provider lane fails.
//!
//! The fallback never fails and always produces non-empty content: a
//! fixed degraded-service preamble, optionally enriched with the best
//! similar question from the cache and with category-specific
//! troubleshooting guidance. Its confidence is the matched similarity
//! score (or a fixed low default), **not** a structural score — the one
//! path that bypasses the confidence scorer, preserved as-is from the
//! original product behavior.

use semantic_cache::SimilarityCache;
use tracing::debug;

use crate::prompt::effective_category;

/// Confidence assigned when no similar cached question is found.
pub(crate) const DEFAULT_FALLBACK_CONFIDENCE: f32 = 0.3;

const PREAMBLE: &str = "The AI generation service is currently unavailable.\n\n\
To resolve this:\n\
1. Ensure Ollama is installed (https://ollama.com)\n\
2. Run 'ollama run mistral' in your terminal\n\
3. Check if Ollama is running on http://localhost:11434\n\
4. Restart the server\n\n\
Let me help you with alternative solutions:";

/// Assembled fallback answer.
pub(crate) struct FallbackAnswer {
    pub content: String,
    pub confidence: f32,
    pub has_similar_cases: bool,
}

/// Builds the fallback answer for one question.
pub(crate) fn build(
    question: &str,
    category: &str,
    cache: &SimilarityCache,
    threshold: f32,
) -> FallbackAnswer {
    let mut content = String::from(PREAMBLE);
    let mut confidence = DEFAULT_FALLBACK_CONFIDENCE;

    let similar = cache.lookup(question, threshold);
    let has_similar_cases = !similar.is_empty();
    if let Some(best) = similar.first() {
        debug!(
            similarity = best.similarity,
            "fallback enriched from similarity cache"
        );
        content.push_str("\n\nFound a similar question:\n");
        content.push_str(&best.query);
        confidence = best.similarity;
    }

    let category = effective_category(category);
    if let Some(guide) = category_troubleshooting(category) {
        content.push_str("\n\nCommon troubleshooting steps for ");
        content.push_str(category);
        content.push_str(":\n");
        content.push_str(guide);
    }

    FallbackAnswer {
        content,
        confidence,
        has_similar_cases,
    }
}

/// Static category-specific troubleshooting guidance.
///
/// Unknown categories get no section at all.
fn category_troubleshooting(category: &str) -> Option<&'static str> {
    match category {
        "Technical" => Some(
            "1. Check if Ollama is running (ollama list)\n\
             2. Verify model is downloaded (ollama pull mistral)\n\
             3. Check system resources\n\
             4. Restart Ollama service if needed\n\
             5. Check network connectivity",
        ),
        "General" => Some(
            "1. Clear application cache\n\
             2. Check for Ollama updates\n\
             3. Verify model availability\n\
             4. Review recent changes\n\
             5. Check system requirements",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_cache_yields_default_confidence() {
        let cache = SimilarityCache::new(8);
        let fb = build("my printer is offline", "Technical", &cache, 0.5);

        assert!(fb.content.starts_with("The AI generation service"));
        assert_relative_eq!(fb.confidence, DEFAULT_FALLBACK_CONFIDENCE);
        assert!(!fb.has_similar_cases);
        assert!(!fb.content.contains("Found a similar question"));
    }

    #[test]
    fn similar_question_enriches_content_and_confidence() {
        let cache = SimilarityCache::new(8);
        cache.insert("my printer is offline", "Technical");

        let fb = build("my printer is offline", "Technical", &cache, 0.5);
        assert!(fb.content.contains("Found a similar question:\nmy printer is offline"));
        assert_relative_eq!(fb.confidence, 1.0, epsilon = 1e-6);
        assert!(fb.has_similar_cases);
    }

    #[test]
    fn known_categories_append_guidance() {
        let cache = SimilarityCache::new(8);
        let fb = build("anything", "Technical", &cache, 0.5);
        assert!(fb.content.contains("Common troubleshooting steps for Technical"));
        assert!(fb.content.contains("ollama pull mistral"));
    }

    #[test]
    fn unknown_category_omits_guidance() {
        let cache = SimilarityCache::new(8);
        let fb = build("anything", "Billing", &cache, 0.5);
        assert!(!fb.content.contains("Common troubleshooting steps"));
    }

    #[test]
    fn blank_category_uses_general_guidance() {
        let cache = SimilarityCache::new(8);
        let fb = build("anything", "", &cache, 0.5);
        assert!(fb.content.contains("Common troubleshooting steps for General"));
    }
}
