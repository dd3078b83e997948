//! The analysis report handed to presentation and storage layers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::power::PowerAnalysis;
use crate::types::{CategoryResult, Persona, RiskLevel};

pub type CategoryMap = BTreeMap<String, CategoryResult>;

/// Full result of analysing one document.
///
/// Built once per document and never mutated afterwards. Maps are ordered so
/// two analyses of the same text serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub risk_score: u8,
    pub transparency_score: u8,
    pub risk_breakdown: CategoryMap,
    pub dark_patterns: CategoryMap,
    pub positive_indicators: CategoryMap,
    pub flagged_sections: Vec<FlaggedSection>,
    pub total_flags: usize,
    pub executive_summary: ExecutiveSummary,
    pub readability: ReadabilityMetrics,
    /// Length of the input in bytes
    pub text_length: usize,
    pub section_count: usize,
    pub classification: ClassificationInfo,
    pub user_persona: Persona,
    /// Absent only for empty input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_analysis: Option<PowerAnalysis>,
}

impl AnalysisReport {
    /// The canonical report for empty or whitespace-only text
    pub fn empty(persona: Persona, method: ClassificationMethod) -> Self {
        Self {
            risk_score: 0,
            transparency_score: 100,
            risk_breakdown: CategoryMap::new(),
            dark_patterns: CategoryMap::new(),
            positive_indicators: CategoryMap::new(),
            flagged_sections: Vec::new(),
            total_flags: 0,
            executive_summary: ExecutiveSummary::no_findings(),
            readability: ReadabilityMetrics::default(),
            text_length: 0,
            section_count: 0,
            classification: ClassificationInfo {
                method,
                sentences_processed: 0,
                confidence_scores: BTreeMap::new(),
            },
            user_persona: persona,
            power_analysis: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.risk_breakdown.is_empty()
            && self.dark_patterns.is_empty()
            && self.positive_indicators.is_empty()
    }
}

/// One issue line in the executive summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryIssue {
    /// Title-cased category name, e.g. "Arbitration Waiver"
    pub kind: String,
    pub count: usize,
    pub impact: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub overall_assessment: String,
    pub critical_issues: Vec<SummaryIssue>,
    pub moderate_concerns: Vec<SummaryIssue>,
    pub immediate_actions: Vec<String>,
    pub next_steps: Vec<String>,
    pub risk_level: RiskLevel,
    pub bottom_line: String,
}

impl ExecutiveSummary {
    /// Minimal summary used when summary generation fails
    pub fn fallback() -> Self {
        Self {
            overall_assessment: "Analysis completed but summary generation failed".to_string(),
            critical_issues: Vec::new(),
            moderate_concerns: Vec::new(),
            immediate_actions: vec!["Review the flagged sections manually".to_string()],
            next_steps: Vec::new(),
            risk_level: RiskLevel::Medium,
            bottom_line: "Manual review recommended".to_string(),
        }
    }

    /// Summary for a document with nothing to report
    pub fn no_findings() -> Self {
        Self {
            overall_assessment: "No text to analyze".to_string(),
            critical_issues: Vec::new(),
            moderate_concerns: Vec::new(),
            immediate_actions: Vec::new(),
            next_steps: Vec::new(),
            risk_level: RiskLevel::Low,
            bottom_line: "Nothing was found to assess".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityMetrics {
    pub readability_score: u8,
    pub word_count: usize,
    pub avg_sentence_length: f64,
    /// Percentage of words that are long or legal jargon
    pub complex_words_ratio: f64,
}

impl Default for ReadabilityMetrics {
    fn default() -> Self {
        Self {
            readability_score: 100,
            word_count: 0,
            avg_sentence_length: 0.0,
            complex_words_ratio: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    Risk,
    DarkPattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFlag {
    pub kind: FlagKind,
    pub category: String,
    pub text: String,
    pub description: String,
}

/// A section that produced at least one risk or dark-pattern flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedSection {
    pub section: usize,
    pub title: String,
    pub excerpt: String,
    pub flags: Vec<SectionFlag>,
    pub flag_count: usize,
}

/// Which detection path filled the breakdown maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Clause matcher only; the classifier fallback was absent or unavailable
    Patterns,
    /// Sentence-level enhanced pattern classifier merged in
    EnhancedPatterns,
    /// Embedding centroid classifier merged in
    Embedding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInfo {
    pub method: ClassificationMethod,
    pub sentences_processed: usize,
    /// Mean classifier confidence per category (positives prefixed `positive_`)
    pub confidence_scores: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_shape() {
        let report = AnalysisReport::empty(Persona::default(), ClassificationMethod::Patterns);
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.transparency_score, 100);
        assert!(report.is_empty());
        assert!(report.power_analysis.is_none());
    }

    #[test]
    fn test_empty_report_omits_power_analysis_in_json() {
        let report = AnalysisReport::empty(Persona::Developer, ClassificationMethod::Patterns);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("power_analysis").is_none());
        assert_eq!(json["user_persona"], "developer");
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = AnalysisReport::empty(Persona::default(), ClassificationMethod::Embedding);
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
