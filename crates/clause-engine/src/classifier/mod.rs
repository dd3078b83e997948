//! Sentence classifiers
//!
//! A second opinion on each sentence, merged into the clause matcher's
//! results. The classifier is picked once when the engine is built; an
//! unavailable classifier contributes nothing and the report says so through
//! its classification method.

#[cfg(feature = "embedding")]
pub mod centroid;

use std::collections::BTreeMap;

use shared_types::{ClassificationMethod, Severity};

use crate::catalog::{Catalog, RuleSet};
use crate::confidence;

#[cfg(feature = "embedding")]
pub use centroid::{CentroidClassifier, Embedder, EmbeddingError, LexiconEmbedder};

/// Which report map a classification belongs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Risk,
    DarkPattern,
    Positive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: IndicatorKind,
    pub confidence: f64,
    pub severity: Severity,
    pub weight: u32,
    pub description: &'static str,
}

/// Category id -> classification for one sentence
pub type Classifications = BTreeMap<String, Classification>;

pub trait ClauseClassifier: Send + Sync {
    /// Method reported when this classifier contributed
    fn method(&self) -> ClassificationMethod;

    fn is_available(&self) -> bool;

    fn classify(&self, sentence: &str) -> Classifications;
}

/// Always unavailable; the engine reports pattern results only
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClassifier;

impl ClauseClassifier for NullClassifier {
    fn method(&self) -> ClassificationMethod {
        ClassificationMethod::Patterns
    }

    fn is_available(&self) -> bool {
        false
    }

    fn classify(&self, _sentence: &str) -> Classifications {
        Classifications::new()
    }
}

/// Sentence-level classifier over the enhanced rule sets
pub struct PatternClassifier {
    catalog: &'static Catalog,
}

impl PatternClassifier {
    pub fn new(catalog: &'static Catalog) -> Self {
        Self { catalog }
    }
}

impl ClauseClassifier for PatternClassifier {
    fn method(&self) -> ClassificationMethod {
        ClassificationMethod::EnhancedPatterns
    }

    fn is_available(&self) -> bool {
        true
    }

    fn classify(&self, sentence: &str) -> Classifications {
        let mut out = Classifications::new();
        classify_with(&self.catalog.enhanced_risk, IndicatorKind::Risk, sentence, &mut out);
        classify_with(
            &self.catalog.enhanced_dark_patterns,
            IndicatorKind::DarkPattern,
            sentence,
            &mut out,
        );
        classify_with(
            &self.catalog.enhanced_positive,
            IndicatorKind::Positive,
            sentence,
            &mut out,
        );
        out
    }
}

fn classify_with(rules: &RuleSet, kind: IndicatorKind, sentence: &str, out: &mut Classifications) {
    for rule in rules.iter() {
        let hits = rule.expression_hits(sentence);
        if hits == 0 {
            continue;
        }
        let longest = rule
            .expressions
            .iter()
            .filter_map(|re| re.find(sentence))
            .map(|m| m.as_str().chars().count())
            .max()
            .unwrap_or(0);
        out.insert(
            rule.category.to_string(),
            Classification {
                kind,
                confidence: confidence::score(rule.confidence_base, longest, sentence, hits),
                severity: rule.severity,
                weight: rule.weight.unsigned_abs(),
                description: rule.description,
            },
        );
    }
}
