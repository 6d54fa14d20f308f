//! Prompt construction for provider calls.

use llm_providers::ChatTurn;

/// Category used when the caller supplies none.
pub(crate) const DEFAULT_CATEGORY: &str = "General";

/// How many trailing conversation turns are passed to providers.
const CONTEXT_TURNS: usize = 3;

/// System-style instruction naming the category.
pub(crate) fn system_prompt(category: &str) -> String {
    let category = effective_category(category);
    format!(
        "You are a helpful AI assistant specialized in {category} topics. \
         Provide clear and concise responses."
    )
}

/// Falls back to the generic category for blank input.
pub(crate) fn effective_category(category: &str) -> &str {
    if category.trim().is_empty() {
        DEFAULT_CATEGORY
    } else {
        category
    }
}

/// Keeps only the most recent conversation turns.
pub(crate) fn recent_turns(context: &[ChatTurn]) -> &[ChatTurn] {
    let start = context.len().saturating_sub(CONTEXT_TURNS);
    &context[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_providers::ChatTurn;

    #[test]
    fn system_prompt_names_the_category() {
        let prompt = system_prompt("Technical");
        assert!(prompt.contains("specialized in Technical topics"));
    }

    #[test]
    fn blank_category_falls_back_to_general() {
        assert!(system_prompt("").contains("specialized in General topics"));
        assert!(system_prompt("  ").contains("specialized in General topics"));
    }

    #[test]
    fn only_the_last_three_turns_are_kept() {
        let context: Vec<ChatTurn> = (0..5)
            .map(|i| ChatTurn::user(format!("turn {i}")))
            .collect();
        let recent = recent_turns(&context);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content, "turn 2");
        assert_eq!(recent[2].content, "turn 4");
    }

    #[test]
    fn short_context_is_passed_through() {
        let context = vec![ChatTurn::user("only one")];
        assert_eq!(recent_turns(&context).len(), 1);
        assert!(recent_turns(&[]).is_empty());
    }
}
