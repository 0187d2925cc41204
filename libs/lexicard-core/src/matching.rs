//! Answer matching for quiz sessions.

use serde::{Deserialize, Serialize};

/// Result of comparing a given answer to the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the answer is considered correct.
    pub is_correct: bool,
    /// Normalized given answer (for display).
    pub typed_normalized: String,
    /// Normalized correct answer (for display).
    pub correct_normalized: String,
}

/// Compare an answer to the correct answer.
///
/// Both sides are trimmed and lowercased, then compared exactly. Inner
/// whitespace and punctuation are significant.
pub fn compare_answers(typed: &str, correct: &str) -> MatchResult {
    let typed_normalized = normalize(typed);
    let correct_normalized = normalize(correct);

    MatchResult {
        is_correct: typed_normalized == correct_normalized,
        typed_normalized,
        correct_normalized,
    }
}

/// Normalized key used for answer comparison and option deduplication.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
