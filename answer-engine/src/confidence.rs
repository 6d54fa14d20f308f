//! Structural confidence scoring for generated answers.
//!
//! The score is a weighted sum of four structural signals. The weights
//! are preserved from the original product behavior and are not tuned;
//! treat them as a compatibility constant, not a statement of intent.

use crate::structure::ResponseStructure;

const WEIGHT_STEPS: f32 = 0.4;
const WEIGHT_CODE: f32 = 0.2;
const WEIGHT_VERIFICATION: f32 = 0.2;
const WEIGHT_LENGTH: f32 = 0.2;

/// Content length (in characters) above which an answer counts as substantial.
const LENGTH_FLOOR: usize = 100;

/// Scores an answer from its content and extracted structure.
///
/// Returns a value in `[0, 1]`; the clamp is redundant while the weights
/// sum to 1 but is kept so future weight changes cannot leak an
/// out-of-range score.
pub(crate) fn score(content: &str, structure: &ResponseStructure) -> f32 {
    let mut score = 0.0;
    if !structure.steps.is_empty() {
        score += WEIGHT_STEPS;
    }
    if !structure.code_samples.is_empty() {
        score += WEIGHT_CODE;
    }
    if !structure.verification_steps.is_empty() {
        score += WEIGHT_VERIFICATION;
    }
    if content.chars().count() > LENGTH_FLOOR {
        score += WEIGHT_LENGTH;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn full_structure() -> ResponseStructure {
        ResponseStructure {
            steps: vec!["1. step".into()],
            code_samples: vec!["echo ok".into()],
            verification_steps: vec!["verify it".into()],
        }
    }

    #[test]
    fn full_structure_and_long_content_scores_one() {
        let content = "x".repeat(150);
        assert_relative_eq!(score(&content, &full_structure()), 1.0);
    }

    #[test]
    fn bare_short_content_scores_zero() {
        assert_relative_eq!(score("short ans", &ResponseStructure::default()), 0.0);
    }

    #[test]
    fn steps_alone_score_their_weight() {
        let structure = ResponseStructure {
            steps: vec!["1. only".into()],
            ..Default::default()
        };
        assert_relative_eq!(score("tiny", &structure), 0.4);
    }

    #[test]
    fn length_boundary_is_strictly_greater() {
        let exactly_100 = "y".repeat(100);
        let over_100 = "y".repeat(101);
        assert_relative_eq!(score(&exactly_100, &ResponseStructure::default()), 0.0);
        assert_relative_eq!(score(&over_100, &ResponseStructure::default()), 0.2);
    }
}
