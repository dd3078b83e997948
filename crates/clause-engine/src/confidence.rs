//! Match confidence
//!
//! A category's base confidence plus small boosts for specific matched text,
//! formal legal phrasing and co-occurring expressions, capped at 0.95.

pub const MAX_CONFIDENCE: f64 = 0.95;

const SPECIFICITY_CAP: f64 = 0.2;
const LEGAL_BOOST: f64 = 0.1;
const CO_OCCURRENCE_STEP: f64 = 0.05;
const CO_OCCURRENCE_CAP: f64 = 0.15;

/// Formal connectives typical of binding legal drafting
const LEGAL_TERMS: &[&str] = &[
    "shall",
    "hereby",
    "whereas",
    "notwithstanding",
    "pursuant",
    "thereunder",
];

pub fn has_legal_phrasing(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    LEGAL_TERMS.iter().any(|term| lower.contains(term))
}

/// Confidence for a hit.
///
/// `matched_chars` is the length of the matched text, `co_occurring` the
/// number of distinct expressions of the same category hitting the sentence
/// (at least 1).
pub fn score(base: f64, matched_chars: usize, sentence: &str, co_occurring: usize) -> f64 {
    score_with_phrasing(base, matched_chars, has_legal_phrasing(sentence), co_occurring)
}

/// [`score`] with the sentence's legal phrasing already known
pub fn score_with_phrasing(
    base: f64,
    matched_chars: usize,
    legal_phrasing: bool,
    co_occurring: usize,
) -> f64 {
    let specificity = (matched_chars as f64 / 100.0).min(SPECIFICITY_CAP);
    let legal = if legal_phrasing { LEGAL_BOOST } else { 0.0 };
    let multi = (co_occurring.saturating_sub(1) as f64 * CO_OCCURRENCE_STEP).min(CO_OCCURRENCE_CAP);
    round3((base + specificity + legal + multi).min(MAX_CONFIDENCE))
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_only() {
        assert_eq!(score(0.7, 0, "plain words", 1), 0.7);
    }

    #[test]
    fn test_specificity_boost_is_capped() {
        assert_eq!(score(0.5, 10, "plain words", 1), 0.6);
        assert_eq!(score(0.5, 500, "plain words", 1), 0.7);
    }

    #[test]
    fn test_legal_phrasing_boost() {
        assert_eq!(score(0.5, 0, "The user SHALL comply", 1), 0.6);
        assert!(has_legal_phrasing("Notwithstanding the above"));
        assert!(!has_legal_phrasing("We may share data"));
    }

    #[test]
    fn test_precomputed_phrasing_matches_scan() {
        let sentence = "You hereby waive all claims";
        assert_eq!(
            score_with_phrasing(0.6, 12, true, 2),
            score(0.6, 12, sentence, 2)
        );
    }

    #[test]
    fn test_co_occurrence_boost() {
        assert_eq!(score(0.5, 0, "x", 2), 0.55);
        assert_eq!(score(0.5, 0, "x", 10), 0.65);
    }

    #[test]
    fn test_capped_at_max() {
        assert_eq!(score(0.9, 100, "hereby", 4), MAX_CONFIDENCE);
    }
}
