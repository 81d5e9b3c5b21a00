//! Fallback extraction
//!
//! When a run ends without an accepted answer, salvage the most recent
//! substantive content from the transcript.

use crate::core::{OrchestrationResult, Turn};

/// Message used when nothing in the transcript is usable
pub const NO_RESULT_MESSAGE: &str = "Could not find matches after max iterations";

/// Whether text has more than `min_chars` non-whitespace characters
pub fn is_substantive(text: &str, min_chars: usize) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).count() > min_chars
}

/// Scans a transcript newest-first for usable text
#[derive(Debug, Clone, Copy)]
pub struct FallbackExtractor {
    min_chars: usize,
}

impl FallbackExtractor {
    /// Create an extractor with the minimum-content threshold
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Most recent assistant or tool-result text above the threshold.
    ///
    /// The seed user turn is the instruction itself and never qualifies.
    pub fn find<'a>(&self, turns: &'a [Turn]) -> Option<&'a str> {
        turns
            .iter()
            .rev()
            .filter(|t| !matches!(t, Turn::User { .. }))
            .map(Turn::text)
            .find(|text| is_substantive(text, self.min_chars))
    }

    /// Always produces a non-empty, unsuccessful result
    pub fn extract(&self, turns: &[Turn]) -> OrchestrationResult {
        match self.find(turns) {
            Some(text) => OrchestrationResult::failure(text),
            None => OrchestrationResult::failure(NO_RESULT_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant(text: &str) -> Turn {
        Turn::Assistant {
            text: text.into(),
            tool_calls: vec![],
        }
    }

    #[test]
    fn test_is_substantive_ignores_whitespace() {
        assert!(!is_substantive("   a b c d e f g h i j   ", 10));
        assert!(is_substantive("abcdefghijk", 10));
        assert!(!is_substantive("", 10));
    }

    #[test]
    fn test_returns_most_recent_qualifying_turn() {
        let turns = vec![
            Turn::User {
                text: "a long instruction that must not be echoed".into(),
            },
            assistant("Older but long enough answer"),
            assistant("Newer long enough answer"),
            assistant("ok"),
            assistant("   "),
        ];

        let result = FallbackExtractor::new(10).extract(&turns);
        assert_eq!(result.text, "Newer long enough answer");
        assert!(!result.success);
    }

    #[test]
    fn test_tool_results_qualify() {
        let turns = vec![
            assistant(""),
            Turn::ToolResult {
                call_id: "c".into(),
                tool_name: "search_people_by_skill".into(),
                payload: r#"[{"name":"Ana"}]"#.into(),
            },
            assistant(""),
        ];
        assert_eq!(
            FallbackExtractor::new(10).find(&turns),
            Some(r#"[{"name":"Ana"}]"#)
        );
    }

    #[test]
    fn test_nothing_usable() {
        let turns = vec![
            Turn::User {
                text: "find me a team please".into(),
            },
            assistant("hmm"),
        ];
        let result = FallbackExtractor::new(10).extract(&turns);
        assert_eq!(result.text, NO_RESULT_MESSAGE);
        assert!(!result.success);
    }
}
