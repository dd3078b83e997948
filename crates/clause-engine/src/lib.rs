//! Clause risk engine for terms of service and privacy policies
//!
//! Two independent scoring pipelines run over the same text and are reported
//! side by side:
//!
//! - Clause-weighted: sections are scanned for risk, dark-pattern and positive
//!   categories, optionally reinforced by a sentence classifier, then folded
//!   into a risk score, a transparency score and an executive summary
//! - Power-weighted: who holds control in the agreement, how hard it is to
//!   leave and how user data is monetised
//!
//! Only a broken pattern catalog aborts an analysis. Everything else degrades
//! locally and the report records how it was produced.

pub mod catalog;
pub mod classifier;
pub mod confidence;
pub mod error;
pub mod matcher;
pub mod merger;
pub mod policy;
pub mod power;
pub mod readability;
pub mod scoring;
pub mod segmenter;

use sha2::{Digest, Sha256};
use shared_types::{
    AnalysisReport, ClassificationInfo, ClassificationMethod, ExecutiveSummary, Persona,
};
use tracing::{debug, instrument, warn};

pub use catalog::{Catalog, CatalogError};
pub use classifier::{ClauseClassifier, NullClassifier, PatternClassifier};
#[cfg(feature = "embedding")]
pub use classifier::{CentroidClassifier, Embedder, EmbeddingError, LexiconEmbedder};
pub use error::{EngineError, SummaryError};
pub use policy::ScoringPolicy;
pub use power::PowerStructureAnalyzer;

use matcher::ClauseMatcher;
use merger::{collect_classifications, merge_category_maps};
use scoring::RiskAggregator;

/// ClauseEngine entry point
///
/// Built once by the application and shared across requests; it holds no
/// mutable state.
pub struct ClauseEngine {
    catalog: &'static Catalog,
    classifier: Box<dyn ClauseClassifier>,
    policy: ScoringPolicy,
}

impl ClauseEngine {
    /// Pattern-only engine with the default scoring policy
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            catalog: Catalog::builtin()?,
            classifier: Box::new(NullClassifier),
            policy: ScoringPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn ClauseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Reinforce matches with the sentence-level enhanced pattern sets
    pub fn with_pattern_classifier(self) -> Self {
        let classifier = PatternClassifier::new(self.catalog);
        self.with_classifier(Box::new(classifier))
    }

    /// Use an embedding classifier. If the embedder cannot build the category
    /// centroids the engine stays on pattern results only.
    #[cfg(feature = "embedding")]
    pub fn with_embedder<E: Embedder + 'static>(self, embedder: E) -> Self {
        match CentroidClassifier::new(embedder) {
            Ok(classifier) => self.with_classifier(Box::new(classifier)),
            Err(e) => {
                warn!(error = %e, "embedding classifier unavailable, using patterns only");
                self.with_classifier(Box::new(NullClassifier))
            }
        }
    }

    /// Method reported for analyses run by this engine
    pub fn method(&self) -> ClassificationMethod {
        if self.classifier.is_available() {
            self.classifier.method()
        } else {
            ClassificationMethod::Patterns
        }
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Analyze for the default persona
    pub fn analyze_text(&self, text: &str) -> AnalysisReport {
        self.analyze(text, Persona::default())
    }

    /// Full analysis. Deterministic for a given engine, text and persona.
    #[instrument(skip(self, text), fields(len = text.len(), persona = %persona))]
    pub fn analyze(&self, text: &str, persona: Persona) -> AnalysisReport {
        if text.trim().is_empty() {
            debug!("blank input, returning empty report");
            let mut report = AnalysisReport::empty(persona, self.method());
            report.text_length = text.len();
            return report;
        }

        let sections = segmenter::segment_sections(text);
        let mut outcome = ClauseMatcher::new(self.catalog).match_sections(&sections);

        let mut classification = ClassificationInfo {
            method: ClassificationMethod::Patterns,
            sentences_processed: 0,
            confidence_scores: Default::default(),
        };
        if let Some(classified) = collect_classifications(self.classifier.as_ref(), text, &sections) {
            merge_category_maps(&mut outcome.risk, classified.risk);
            merge_category_maps(&mut outcome.dark_patterns, classified.dark_patterns);
            merge_category_maps(&mut outcome.positive, classified.positive);
            classification = ClassificationInfo {
                method: self.classifier.method(),
                sentences_processed: classified.sentences_processed,
                confidence_scores: classified.confidence_scores,
            };
        }

        let aggregator = RiskAggregator::new(&self.policy);
        let risk_score = aggregator.risk_score(&outcome.risk, &outcome.dark_patterns);
        let transparency_score =
            aggregator.transparency_score(risk_score, &outcome.dark_patterns, &outcome.positive);
        let executive_summary = aggregator
            .summary(risk_score, &outcome.risk, &outcome.dark_patterns)
            .unwrap_or_else(|e| {
                warn!(error = %e, "summary generation failed, using fallback summary");
                ExecutiveSummary::fallback()
            });

        let power_analysis = PowerStructureAnalyzer::new(&self.catalog.power).analyze(text, persona);

        debug!(
            risk_score,
            transparency_score,
            sections = sections.len(),
            flags = outcome.total_flags,
            "analysis finished"
        );

        AnalysisReport {
            risk_score,
            transparency_score,
            risk_breakdown: outcome.risk,
            dark_patterns: outcome.dark_patterns,
            positive_indicators: outcome.positive,
            flagged_sections: outcome.flagged_sections,
            total_flags: outcome.total_flags,
            executive_summary,
            readability: readability::readability(text),
            text_length: text.len(),
            section_count: sections.len(),
            classification,
            user_persona: persona,
            power_analysis: Some(power_analysis),
        }
    }
}

/// One-shot analysis with a pattern-only engine.
///
/// Unknown persona names fall back to the default persona. Fails only when
/// the pattern catalog cannot be compiled.
pub fn analyze(text: &str, persona: Option<&str>) -> Result<AnalysisReport, EngineError> {
    let engine = ClauseEngine::new()?;
    Ok(engine.analyze(text, resolve_persona(persona)))
}

/// Parse a persona name, warning and falling back to the default when unknown
pub fn resolve_persona(name: Option<&str>) -> Persona {
    match name.map(str::parse::<Persona>) {
        None => Persona::default(),
        Some(Ok(persona)) => persona,
        Some(Err(e)) => {
            warn!(error = %e, "falling back to default persona");
            Persona::default()
        }
    }
}

/// Lowercase hex SHA-256 of the raw document bytes
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Provenance;

    #[test]
    fn test_blank_text_gives_canonical_report() {
        let engine = ClauseEngine::new().unwrap();
        let report = engine.analyze_text(" \n\t ");
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.transparency_score, 100);
        assert!(report.risk_breakdown.is_empty());
        assert!(report.power_analysis.is_none());
        assert_eq!(report.text_length, 4);
    }

    #[test]
    fn test_engine_reports_section_count_and_persona() {
        let engine = ClauseEngine::new().unwrap();
        let text = "1. DATA COLLECTION\nWe collect your email address.\n2. DISPUTES\nAll claims go to binding arbitration.\n";
        let report = engine.analyze(text, Persona::Developer);
        assert_eq!(report.section_count, 2);
        assert_eq!(report.user_persona, Persona::Developer);
        assert_eq!(report.classification.method, ClassificationMethod::Patterns);
        assert_eq!(report.classification.sentences_processed, 0);
        assert!(report.power_analysis.is_some());
    }

    #[test]
    fn test_pattern_classifier_merges_into_breakdown() {
        let engine = ClauseEngine::new().unwrap().with_pattern_classifier();
        let text = "All disputes are subject to binding arbitration. \
                    Claims shall be resolved exclusively through arbitration on an individual basis.";
        let report = engine.analyze_text(text);
        assert_eq!(report.classification.method, ClassificationMethod::EnhancedPatterns);
        assert_eq!(report.classification.sentences_processed, 2);
        let arbitration = &report.risk_breakdown["arbitration_waiver"];
        assert_eq!(arbitration.provenance, Provenance::Merged);
        assert_eq!(arbitration.count, arbitration.matches.len());
    }

    #[cfg(feature = "embedding")]
    #[test]
    fn test_broken_embedder_degrades_to_patterns() {
        struct Broken;
        impl Embedder for Broken {
            fn dimensions(&self) -> usize {
                8
            }
            fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
                Err(EmbeddingError::Unavailable("model missing".into()))
            }
        }

        let engine = ClauseEngine::new().unwrap().with_embedder(Broken);
        assert_eq!(engine.method(), ClassificationMethod::Patterns);
        let report = engine.analyze_text("All disputes go to binding arbitration.");
        assert_eq!(report.classification.method, ClassificationMethod::Patterns);
        assert!(report.risk_breakdown.contains_key("arbitration_waiver"));
    }

    #[cfg(feature = "embedding")]
    #[test]
    fn test_lexicon_embedder_contributes_classifications() {
        let engine = ClauseEngine::new().unwrap().with_embedder(LexiconEmbedder);
        assert_eq!(engine.method(), ClassificationMethod::Embedding);
        let report = engine.analyze_text(
            "You have the right to access your personal data and may request deletion at any time. \
             We will notify you in advance of any changes.",
        );
        assert_eq!(report.classification.method, ClassificationMethod::Embedding);
        assert_eq!(report.classification.sentences_processed, 2);
        assert!(report.classification.confidence_scores.contains_key("positive_user_rights"));
        assert!(report.classification.confidence_scores.contains_key("positive_transparency"));
        assert_eq!(report.positive_indicators["user_rights"].provenance, Provenance::Merged);
        assert!(report.risk_breakdown.is_empty());
    }

    #[cfg(feature = "embedding")]
    #[test]
    fn test_lexicon_embedder_merges_risk_sentences() {
        let patterns_only = ClauseEngine::new().unwrap();
        let embedding = ClauseEngine::new().unwrap().with_embedder(LexiconEmbedder);
        let text = "We may share your personal information with third parties. \
                    You waive your right to a jury trial and agree to binding arbitration.";

        let base = patterns_only.analyze_text(text);
        let merged = embedding.analyze_text(text);
        for category in ["data_sharing", "arbitration_waiver"] {
            let result = &merged.risk_breakdown[category];
            assert_eq!(result.provenance, Provenance::Merged);
            assert_eq!(result.count, base.risk_breakdown[category].count + 1);
        }
    }

    #[test]
    fn test_resolve_persona() {
        assert_eq!(resolve_persona(None), Persona::IndividualUser);
        assert_eq!(resolve_persona(Some("healthcare")), Persona::HealthcareProvider);
        assert_eq!(resolve_persona(Some("business_user")), Persona::SmallBusiness);
        assert_eq!(resolve_persona(Some("astronaut")), Persona::IndividualUser);
    }

    #[test]
    fn test_free_function_analyze() {
        let report = analyze("We may share your information with third parties.", Some("developer")).unwrap();
        assert_eq!(report.user_persona, Persona::Developer);
        assert_eq!(report.risk_score, 70);
    }

    #[test]
    fn test_content_hash() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
