//! Readability metrics for the report

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::ReadabilityMetrics;

use crate::segmenter::fragments;

/// Words longer than this count as complex
const LONG_WORD_CHARS: usize = 10;

const LEGAL_JARGON: &[&str] = &[
    "notwithstanding",
    "aforementioned",
    "heretofore",
    "hereafter",
    "pursuant",
    "thereto",
    "whereas",
    "indemnify",
    "arbitration",
    "jurisdiction",
    "covenant",
    "warranty",
    "liability",
    "statutory",
];

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\b\w+\b").unwrap();
}

pub fn readability(text: &str) -> ReadabilityMetrics {
    let lower = text.to_lowercase();
    let words: Vec<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return ReadabilityMetrics::default();
    }

    let sentences = fragments(text).len().max(1);
    let complex = words
        .iter()
        .filter(|w| w.chars().count() > LONG_WORD_CHARS || LEGAL_JARGON.contains(w))
        .count();

    let avg_sentence_length = round1(words.len() as f64 / sentences as f64);
    let complex_words_ratio = round1(complex as f64 / words.len() as f64 * 100.0);
    let score = (100.0 - avg_sentence_length * 2.0 - complex_words_ratio).max(0.0);

    ReadabilityMetrics {
        readability_score: score.min(100.0) as u8,
        word_count: words.len(),
        avg_sentence_length,
        complex_words_ratio,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_fully_readable() {
        let metrics = readability("   ");
        assert_eq!(metrics.readability_score, 100);
        assert_eq!(metrics.word_count, 0);
    }

    #[test]
    fn test_plain_text() {
        // 2 sentences, 9 words, no complex words
        let metrics = readability("We keep your data. You can leave any time.");
        assert_eq!(metrics.word_count, 9);
        assert_eq!(metrics.avg_sentence_length, 4.5);
        assert_eq!(metrics.complex_words_ratio, 0.0);
        assert_eq!(metrics.readability_score, 91);
    }

    #[test]
    fn test_jargon_counts_as_complex() {
        let metrics = readability("Arbitration applies notwithstanding liability.");
        // 4 words, 3 jargon
        assert_eq!(metrics.complex_words_ratio, 75.0);
        assert_eq!(metrics.readability_score, 17);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let text = "indemnification ".repeat(80);
        assert_eq!(readability(&text).readability_score, 0);
    }
}
