//! Line-oriented extraction of structure from raw answers.
//!
//! One pass over the text feeds three independent accumulators: numbered
//! steps, fenced code blocks, and verification-step fragments. The
//! scanner state (open fence, verification mode) lives in an explicit
//! struct advanced line by line. Extraction never fails; malformed input
//! simply yields fewer matches.

/// Ordered structural fragments extracted from one answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ResponseStructure {
    /// Lines starting with `1.` through `9.` after trimming, trimmed.
    pub steps: Vec<String>,
    /// Newline-joined bodies of closed ``` fences, verbatim.
    pub code_samples: Vec<String>,
    /// Trimmed non-blank lines captured while verification mode is on.
    pub verification_steps: Vec<String>,
}

/// Scanner advanced line by line; accumulators are independent.
#[derive(Default)]
struct LineScanner {
    out: ResponseStructure,
    in_code_block: bool,
    code_lines: Vec<String>,
    in_verification: bool,
}

impl LineScanner {
    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if is_step(trimmed) {
            self.out.steps.push(trimmed.to_string());
        }

        if trimmed.starts_with("```") {
            if self.in_code_block {
                self.out.code_samples.push(self.code_lines.join("\n"));
                self.code_lines.clear();
            }
            self.in_code_block = !self.in_code_block;
        } else if self.in_code_block {
            // Code bodies are kept verbatim, not trimmed.
            self.code_lines.push(line.to_string());
        }

        let lower = line.to_lowercase();
        if lower.contains("verif") || lower.contains("test") {
            self.in_verification = true;
        }
        if self.in_verification {
            if trimmed.is_empty() {
                self.in_verification = false;
            } else {
                self.out.verification_steps.push(trimmed.to_string());
            }
        }
    }

    fn finish(self) -> ResponseStructure {
        // An unterminated trailing fence is dropped, not emitted partially.
        self.out
    }
}

/// `1.` through `9.` step prefix check on an already-trimmed line.
fn is_step(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(digit), Some('.')) if ('1'..='9').contains(&digit)
    )
}

/// Extracts steps, code samples, and verification steps from a raw answer.
pub(crate) fn extract(text: &str) -> ResponseStructure {
    let mut scanner = LineScanner::default();
    for line in text.split('\n') {
        scanner.feed(line);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_steps_are_collected_in_order() {
        let parsed = extract("1. do X\n2. do Y\nsome text");
        assert_eq!(parsed.steps, vec!["1. do X", "2. do Y"]);
    }

    #[test]
    fn indented_steps_are_trimmed() {
        let parsed = extract("   3. indented step\nnot 4. a step");
        assert_eq!(parsed.steps, vec!["3. indented step"]);
    }

    #[test]
    fn zero_and_double_digit_prefixes_are_not_steps() {
        let parsed = extract("0. zero\n10. ten\n1x. typo");
        assert!(parsed.steps.is_empty());
    }

    #[test]
    fn closed_fence_yields_code_sample() {
        let parsed = extract("```\ncode line\n```");
        assert_eq!(parsed.code_samples, vec!["code line"]);
    }

    #[test]
    fn multiple_fences_yield_multiple_samples() {
        let parsed = extract("```\nfirst\n```\nprose\n```\nsecond a\nsecond b\n```");
        assert_eq!(parsed.code_samples, vec!["first", "second a\nsecond b"]);
    }

    #[test]
    fn code_bodies_keep_indentation() {
        let parsed = extract("```\n    indented\n```");
        assert_eq!(parsed.code_samples, vec!["    indented"]);
    }

    #[test]
    fn unterminated_fence_is_dropped() {
        let parsed = extract("```\ndangling code");
        assert!(parsed.code_samples.is_empty());
    }

    #[test]
    fn verification_mode_captures_until_blank_line() {
        let parsed = extract("Verify the install:\ncheck the logs\n\nunrelated prose");
        assert_eq!(
            parsed.verification_steps,
            vec!["Verify the install:", "check the logs"]
        );
    }

    #[test]
    fn verification_mode_can_retrigger() {
        let parsed = extract("verify once\n\nmiddle\n\nnow test again\ndone");
        assert_eq!(
            parsed.verification_steps,
            vec!["verify once", "now test again", "done"]
        );
    }

    #[test]
    fn trigger_is_case_insensitive() {
        let parsed = extract("Run the TEST suite");
        assert_eq!(parsed.verification_steps, vec!["Run the TEST suite"]);
    }

    #[test]
    fn empty_input_yields_empty_structure() {
        assert_eq!(extract(""), ResponseStructure::default());
    }
}
