//! Importance scoring for memory text
//!
//! The score gates STM-to-LTM promotion and is stored on long-term entries as
//! `importance` metadata. Scoring is a pure strategy behind a single-method
//! trait so rule-based or model-based scorers can be swapped in without
//! touching the manager.

/// A pure, deterministic importance scorer
///
/// Contract: `score` returns a value in [0.0, 1.0], has no side effects, and
/// adding matching material to the text never decreases the score.
pub trait ImportanceScorer: Send + Sync {
    /// Score how noteworthy `text` is, in [0.0, 1.0]
    fn score(&self, text: &str) -> f64;
}

/// Default keyword vocabulary: urgency and escalation terms
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "urgent", "asap", "important", "call", "meeting", "deadline", "fail", "alert",
];

/// Keyword-based heuristic scorer
///
/// Counts how many vocabulary terms occur in the text (case-insensitive
/// substring match, each term counted at most once), normalizes by vocabulary
/// size, and clamps to 1.0. The vocabulary is a tunable, not part of the
/// contract.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    keywords: Vec<String>,
}

impl KeywordScorer {
    /// Create a scorer with the default urgency vocabulary
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect())
    }

    /// Create a scorer with a custom vocabulary
    pub fn with_keywords(keywords: Vec<String>) -> Self {
        let keywords = keywords.into_iter().map(|k| k.to_lowercase()).collect();
        Self { keywords }
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportanceScorer for KeywordScorer {
    fn score(&self, text: &str) -> f64 {
        if self.keywords.is_empty() {
            return 0.0;
        }

        let lowered = text.to_lowercase();
        let hits = self.keywords.iter().filter(|k| lowered.contains(k.as_str())).count();

        (hits as f64 / self.keywords.len() as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero() {
        let scorer = KeywordScorer::new();
        assert_eq!(scorer.score(""), 0.0);
        assert_eq!(scorer.score("nothing noteworthy here"), 0.0);
    }

    #[test]
    fn test_single_keyword() {
        let scorer = KeywordScorer::new();
        // "call" is the only hit: 1/8
        let score = scorer.score("task: Call Sarah at 4 PM");
        assert!((score - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_keywords_cross_threshold() {
        let scorer = KeywordScorer::new();
        // urgent, call, asap, meeting, deadline: 5/8
        let score = scorer.score("Urgent! Call Sarah ASAP, meeting at 4PM, deadline today");
        assert!((score - 0.625).abs() < 1e-9);
        assert!(score >= 0.3);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = KeywordScorer::new();
        assert_eq!(scorer.score("URGENT"), scorer.score("urgent"));
    }

    #[test]
    fn test_monotone_in_added_keywords() {
        let scorer = KeywordScorer::new();
        let base = scorer.score("call the team");
        let more = scorer.score("call the team, urgent deadline");
        assert!(more >= base);
    }

    #[test]
    fn test_bounded_and_clamped() {
        let scorer = KeywordScorer::with_keywords(vec!["a".to_string(), "b".to_string()]);
        let score = scorer.score("a b a b a b");
        assert!(score <= 1.0);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_custom_vocabulary() {
        let scorer = KeywordScorer::with_keywords(vec!["rust".to_string()]);
        assert_eq!(scorer.score("I love Rust"), 1.0);
        assert_eq!(scorer.score("urgent meeting"), 0.0);
    }
}
