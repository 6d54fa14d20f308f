//! Provider cascade orchestration and result assembly.
//!
//! The engine owns an ordered list of provider lanes and tries them in
//! order: the first lane that returns non-empty text wins, any failure
//! cascades to the next lane, and no lane is retried within one request.
//! When every lane fails, a deterministic fallback supplies the answer.
//! Either way, one similarity-cache entry is written per completed
//! request so future fallbacks can reference previously seen questions.

use chrono::Utc;
use llm_providers::{ChatTurn, LlmError, ProviderClient};
use semantic_cache::SimilarityCache;
use tracing::{debug, info, warn};

use crate::cfg::EngineConfig;
use crate::confidence;
use crate::error::EngineError;
use crate::fallback;
use crate::prompt;
use crate::structure;
use crate::types::{GenerationMetrics, GenerationResult};

/// Substrings that force escalation to a human agent regardless of score.
const ESCALATION_KEYWORDS: &[&str] = &["security", "compliance", "legal", "hardware"];

/// Confidence below which an answer is routed to a human agent.
const CONFIDENCE_FLOOR: f32 = 0.7;

/// One generation lane the cascade can try.
///
/// [`ProviderClient`] implements this for the HTTP-backed lanes; tests
/// drive the same cascade with scripted lanes.
pub(crate) trait GenerationLane {
    fn lane_name(&self) -> &'static str;
    fn model_id(&self) -> &str;
    async fn dispatch(
        &self,
        system: &str,
        turns: &[ChatTurn],
        question: &str,
    ) -> Result<String, LlmError>;
}

impl GenerationLane for ProviderClient {
    fn lane_name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn model_id(&self) -> &str {
        self.model()
    }

    async fn dispatch(
        &self,
        system: &str,
        turns: &[ChatTurn],
        question: &str,
    ) -> Result<String, LlmError> {
        self.send(system, turns, question).await
    }
}

/// Winning lane attempt.
struct LaneWin {
    text: String,
    provider: String,
    model: String,
}

/// The answer-synthesis pipeline.
///
/// Construct once at the composition root and reuse across requests so
/// the similarity cache accumulates. The engine never writes to any
/// external store; persisting results is the caller's responsibility.
pub struct AnswerEngine {
    lanes: Vec<ProviderClient>,
    cache: SimilarityCache,
    similarity_threshold: f32,
}

impl AnswerEngine {
    /// Builds the engine from an explicit config.
    ///
    /// The remote Hugging Face lane, when configured, is the preferred
    /// lane; any failure cascades to the local Ollama lane.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] if a lane config fails validation.
    pub fn new(cfg: EngineConfig) -> Result<Self, EngineError> {
        let mut lanes = Vec::with_capacity(2);
        if let Some(remote) = cfg.huggingface {
            lanes.push(ProviderClient::from_config(remote)?);
        }
        lanes.push(ProviderClient::from_config(cfg.ollama)?);

        info!(lanes = lanes.len(), "answer engine initialized");

        Ok(Self {
            lanes,
            cache: SimilarityCache::new(cfg.cache_capacity),
            similarity_threshold: cfg.similarity_threshold,
        })
    }

    /// Builds the engine from environment configuration.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] on invalid environment values.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::new(EngineConfig::from_env()?)
    }

    /// Generates a structured answer for one question.
    ///
    /// `context` may carry prior conversation turns; only the most recent
    /// three are forwarded to providers. Provider and cache failures are
    /// recovered internally — the caller either gets a result (possibly a
    /// fallback one, marked via `metrics.is_fallback`) or, only if the
    /// fallback itself produced nothing, [`EngineError::Unavailable`].
    pub async fn generate(
        &self,
        question: &str,
        category: &str,
        context: &[ChatTurn],
    ) -> Result<GenerationResult, EngineError> {
        self.generate_with_lanes(&self.lanes, question, category, context)
            .await
    }

    /// Cascade + assembly over an explicit lane list.
    pub(crate) async fn generate_with_lanes<L: GenerationLane>(
        &self,
        lanes: &[L],
        question: &str,
        category: &str,
        context: &[ChatTurn],
    ) -> Result<GenerationResult, EngineError> {
        let system = prompt::system_prompt(category);
        let turns = prompt::recent_turns(context);

        let attempt = first_success(lanes, &system, turns, question).await;

        let (content, confidence_override, provider, model, is_fallback, has_similar_cases) =
            match attempt {
                Some(win) => (win.text, None, win.provider, win.model, false, false),
                None => {
                    info!("all provider lanes failed, assembling fallback answer");
                    let fb =
                        fallback::build(question, category, &self.cache, self.similarity_threshold);
                    (
                        fb.content,
                        Some(fb.confidence),
                        "fallback".to_string(),
                        "fallback".to_string(),
                        true,
                        fb.has_similar_cases,
                    )
                }
            };

        if content.trim().is_empty() {
            // The fallback always produces content; hitting this means a
            // bug, not a provider outage.
            return Err(EngineError::Unavailable);
        }

        let parsed = structure::extract(&content);
        // The fallback path keeps its similarity-derived (or default)
        // confidence instead of the structural score.
        let confidence =
            confidence_override.unwrap_or_else(|| confidence::score(&content, &parsed));
        let needs_human = confidence < CONFIDENCE_FLOOR || contains_escalation_keyword(&content);

        self.cache
            .insert(question, prompt::effective_category(category));

        let length = content.chars().count();
        Ok(GenerationResult {
            content,
            confidence,
            steps: parsed.steps,
            code_samples: parsed.code_samples,
            verification_steps: parsed.verification_steps,
            needs_human,
            metrics: GenerationMetrics {
                provider,
                model,
                length,
                is_fallback,
                has_similar_cases,
            },
            created_at: Utc::now(),
        })
    }
}

/// Tries lanes in order; the first non-empty completion wins.
///
/// Any lane error — transport, status, decode, timeout, empty text — is
/// logged and cascades to the next lane. Lanes are never retried.
async fn first_success<L: GenerationLane>(
    lanes: &[L],
    system: &str,
    turns: &[ChatTurn],
    question: &str,
) -> Option<LaneWin> {
    for lane in lanes {
        debug!(lane = lane.lane_name(), "attempting provider lane");
        match lane.dispatch(system, turns, question).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(
                    lane = lane.lane_name(),
                    chars = text.len(),
                    "provider lane succeeded"
                );
                return Some(LaneWin {
                    text,
                    provider: lane.lane_name().to_string(),
                    model: lane.model_id().to_string(),
                });
            }
            Ok(_) => {
                warn!(lane = lane.lane_name(), "provider returned empty text, cascading");
            }
            Err(err) => {
                warn!(lane = lane.lane_name(), error = %err, "provider lane failed, cascading");
            }
        }
    }
    None
}

fn contains_escalation_keyword(content: &str) -> bool {
    let lower = content.to_lowercase();
    ESCALATION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use approx::assert_relative_eq;
    use llm_providers::error_handler::ProviderError;
    use llm_providers::{LlmModelConfig, LlmProvider};

    struct ScriptedLane {
        name: &'static str,
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedLane {
        fn ok(name: &'static str, reply: &'static str) -> Self {
            Self {
                name,
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GenerationLane for ScriptedLane {
        fn lane_name(&self) -> &'static str {
            self.name
        }

        fn model_id(&self) -> &str {
            "scripted"
        }

        async fn dispatch(
            &self,
            _system: &str,
            _turns: &[ChatTurn],
            _question: &str,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(ProviderError::EmptyCompletion.into()),
            }
        }
    }

    fn ollama_cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "mistral".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(64),
            temperature: Some(0.7),
            top_p: Some(0.9),
            timeout_secs: Some(1),
        }
    }

    fn hf_cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::HuggingFace,
            model: "tiiuae/falcon-7b-instruct".into(),
            endpoint: "https://api-inference.huggingface.co/models".into(),
            api_key: Some("hf_test".into()),
            max_tokens: Some(64),
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    fn test_engine() -> AnswerEngine {
        AnswerEngine::new(EngineConfig {
            ollama: ollama_cfg(),
            huggingface: None,
            cache_capacity: 16,
            similarity_threshold: 0.5,
        })
        .unwrap()
    }

    #[test]
    fn remote_lane_is_preferred_when_configured() {
        let engine = AnswerEngine::new(EngineConfig {
            ollama: ollama_cfg(),
            huggingface: Some(hf_cfg()),
            cache_capacity: 16,
            similarity_threshold: 0.5,
        })
        .unwrap();

        assert_eq!(engine.lanes.len(), 2);
        assert_eq!(engine.lanes[0].kind(), LlmProvider::HuggingFace);
        assert_eq!(engine.lanes[1].kind(), LlmProvider::Ollama);
    }

    #[tokio::test]
    async fn second_lane_wins_when_first_fails() {
        let engine = test_engine();
        let lanes = vec![
            ScriptedLane::failing("huggingface"),
            ScriptedLane::ok("ollama", "Answer text"),
        ];

        let result = engine
            .generate_with_lanes(&lanes, "how do I log in?", "General", &[])
            .await
            .unwrap();

        assert_eq!(result.content, "Answer text");
        assert_eq!(result.metrics.provider, "ollama");
        assert!(!result.metrics.is_fallback);
        assert_eq!(lanes[0].call_count(), 1);
        assert_eq!(lanes[1].call_count(), 1);
    }

    #[tokio::test]
    async fn first_success_skips_remaining_lanes() {
        let engine = test_engine();
        let lanes = vec![
            ScriptedLane::ok("huggingface", "From the first lane"),
            ScriptedLane::ok("ollama", "never reached"),
        ];

        let result = engine
            .generate_with_lanes(&lanes, "q", "General", &[])
            .await
            .unwrap();

        assert_eq!(result.content, "From the first lane");
        assert_eq!(result.metrics.provider, "huggingface");
        assert_eq!(lanes[0].call_count(), 1);
        assert_eq!(lanes[1].call_count(), 0);
    }

    #[tokio::test]
    async fn no_lane_is_retried_when_all_fail() {
        let engine = test_engine();
        let lanes = vec![
            ScriptedLane::failing("huggingface"),
            ScriptedLane::failing("ollama"),
        ];

        let result = engine
            .generate_with_lanes(&lanes, "q", "General", &[])
            .await
            .unwrap();

        assert!(result.metrics.is_fallback);
        assert_eq!(lanes[0].call_count(), 1);
        assert_eq!(lanes[1].call_count(), 1);
    }

    #[tokio::test]
    async fn all_lanes_failing_yields_fallback_result() {
        let engine = test_engine();
        let lanes: Vec<ScriptedLane> = vec![];

        let result = engine
            .generate_with_lanes(&lanes, "my printer is offline", "Technical", &[])
            .await
            .unwrap();

        assert!(!result.content.is_empty());
        assert!(result.metrics.is_fallback);
        assert_eq!(result.metrics.provider, "fallback");
        assert!((0.0..=1.0).contains(&result.confidence));
        assert_relative_eq!(result.confidence, 0.3);
        // Low confidence routes to a human.
        assert!(result.needs_human);
    }

    #[tokio::test]
    async fn fallback_is_deterministic_across_fresh_engines() {
        let lanes: Vec<ScriptedLane> = vec![];

        let first = test_engine()
            .generate_with_lanes(&lanes, "my printer is offline", "Technical", &[])
            .await
            .unwrap();
        let second = test_engine()
            .generate_with_lanes(&lanes, "my printer is offline", "Technical", &[])
            .await
            .unwrap();

        assert_eq!(first.content, second.content);
        assert_relative_eq!(first.confidence, second.confidence);
    }

    #[tokio::test]
    async fn fallback_reuses_previously_seen_questions() {
        let engine = test_engine();
        let lanes: Vec<ScriptedLane> = vec![];

        let first = engine
            .generate_with_lanes(&lanes, "my printer is offline", "Technical", &[])
            .await
            .unwrap();
        assert!(!first.metrics.has_similar_cases);

        // The first request cached the question, so an identical one now
        // matches with full similarity.
        let second = engine
            .generate_with_lanes(&lanes, "my printer is offline", "Technical", &[])
            .await
            .unwrap();

        assert!(second.metrics.has_similar_cases);
        assert!(second.content.contains("Found a similar question"));
        assert_relative_eq!(second.confidence, 1.0, epsilon = 1e-6);
    }

    #[tokio::test]
    async fn every_completed_request_writes_one_cache_entry() {
        let engine = test_engine();
        let lanes = vec![ScriptedLane::ok("ollama", "Answer text")];

        engine
            .generate_with_lanes(&lanes, "how do I log in?", "General", &[])
            .await
            .unwrap();
        assert_eq!(engine.cache.len(), 1);

        engine
            .generate_with_lanes::<ScriptedLane>(&[], "another question entirely", "General", &[])
            .await
            .unwrap();
        assert_eq!(engine.cache.len(), 2);
    }

    const STRUCTURED_SAFE: &str = "1. Review the network group rules\n\
2. Rotate the affected credentials\n\
```\naudit --full\n```\n\
Verify the change:\ncheck the audit log output carefully\n\
This should restore expected behavior for the affected account.";

    #[tokio::test]
    async fn structured_answer_scores_high_and_stays_automated() {
        let engine = test_engine();
        let lanes = vec![ScriptedLane::ok("ollama", STRUCTURED_SAFE)];

        let result = engine
            .generate_with_lanes(&lanes, "q", "Technical", &[])
            .await
            .unwrap();

        assert_relative_eq!(result.confidence, 1.0);
        assert!(!result.needs_human);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.code_samples, vec!["audit --full"]);
        assert!(!result.verification_steps.is_empty());
    }

    #[tokio::test]
    async fn escalation_keyword_forces_needs_human() {
        let engine = test_engine();
        let content: &'static str = "1. Review the security group rules\n\
2. Rotate the affected credentials\n\
```\naudit --full\n```\n\
Verify the change:\ncheck the audit log output carefully\n\
This should restore expected behavior for the affected account.";
        let lanes = vec![ScriptedLane::ok("ollama", content)];

        let result = engine
            .generate_with_lanes(&lanes, "q", "Technical", &[])
            .await
            .unwrap();

        // Confidence is maximal, yet the keyword still escalates.
        assert_relative_eq!(result.confidence, 1.0);
        assert!(result.needs_human);
    }

    #[tokio::test]
    async fn low_confidence_forces_needs_human() {
        let engine = test_engine();
        let lanes = vec![ScriptedLane::ok("ollama", "A plain short answer.")];

        let result = engine
            .generate_with_lanes(&lanes, "q", "General", &[])
            .await
            .unwrap();

        assert!(result.confidence < 0.7);
        assert!(result.needs_human);
    }
}
