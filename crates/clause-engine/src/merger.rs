//! Result merging
//!
//! Folds sentence classifications into category maps and merges those into
//! the clause matcher's maps by category id.

use std::collections::BTreeMap;

use shared_types::{CategoryMap, CategoryResult, Match, Provenance, Section};
use tracing::debug;

use crate::classifier::{ClauseClassifier, IndicatorKind};
use crate::segmenter::{section_at, split_sentences, truncate_chars};

const CLASSIFIED_TEXT_CHARS: usize = 100;

/// Category maps built from classifier output
#[derive(Debug, Clone, Default)]
pub struct ClassifierOutcome {
    pub risk: CategoryMap,
    pub dark_patterns: CategoryMap,
    pub positive: CategoryMap,
    pub sentences_processed: usize,
    /// Highest confidence seen per category; positives are keyed `positive_<id>`
    pub confidence_scores: BTreeMap<String, f64>,
}

/// Run the classifier over every sentence. `None` when it is unavailable.
pub fn collect_classifications(
    classifier: &dyn ClauseClassifier,
    text: &str,
    sections: &[Section],
) -> Option<ClassifierOutcome> {
    if !classifier.is_available() {
        return None;
    }

    let mut outcome = ClassifierOutcome::default();
    for sentence in split_sentences(text) {
        outcome.sentences_processed += 1;
        for (category, c) in classifier.classify(sentence.text) {
            let m = Match {
                text: truncate_chars(sentence.text, CLASSIFIED_TEXT_CHARS),
                start: sentence.start,
                end: sentence.end,
                section: section_at(sections, sentence.start),
                confidence: Some(c.confidence),
            };
            let (map, score_key) = match c.kind {
                IndicatorKind::Risk => (&mut outcome.risk, category.clone()),
                IndicatorKind::DarkPattern => (&mut outcome.dark_patterns, category.clone()),
                IndicatorKind::Positive => (&mut outcome.positive, format!("positive_{}", category)),
            };
            let best = outcome.confidence_scores.entry(score_key).or_insert(0.0);
            *best = best.max(c.confidence);

            match map.get_mut(&category) {
                Some(existing) => existing.push(m),
                None => {
                    map.insert(
                        category.clone(),
                        CategoryResult::new(
                            category,
                            c.severity,
                            c.weight,
                            c.description,
                            Provenance::Classifier,
                            m,
                        ),
                    );
                }
            }
        }
    }

    debug!(
        sentences = outcome.sentences_processed,
        risk = outcome.risk.len(),
        dark = outcome.dark_patterns.len(),
        positive = outcome.positive.len(),
        "classifier pass finished"
    );
    Some(outcome)
}

/// Merge `extra` into `base` by category id
pub fn merge_category_maps(base: &mut CategoryMap, extra: CategoryMap) {
    for (category, incoming) in extra {
        match base.get_mut(&category) {
            Some(existing) => {
                existing.count += incoming.count;
                existing.matches.extend(incoming.matches);
                existing.confidence = match (existing.confidence, incoming.confidence) {
                    (Some(a), Some(b)) => Some((a + b) / 2.0),
                    (a, b) => a.or(b),
                };
                existing.provenance = Provenance::Merged;
            }
            None => {
                base.insert(category, incoming);
            }
        }
    }
}
