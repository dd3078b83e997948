//! Property-based tests for the clause engine
//!
//! Exercises score bounds, determinism, segmentation and escalation
//! behaviour over generated documents using proptest.

use clause_engine::segmenter::segment_sections;
use clause_engine::ClauseEngine;
use proptest::prelude::*;

// ============================================================
// Generators
// ============================================================

const CLAUSES: &[&str] = &[
    "We may share your information with third parties.",
    "You waive your right to a jury trial.",
    "All disputes are subject to binding arbitration.",
    "We reserve the right to modify these terms at any time.",
    "Your subscription will automatically renew each month.",
    "Additional fees may apply.",
    "We collect device information and track your browsing.",
    "You have the right to access your personal data.",
    "We will notify you in advance of any changes.",
    "Your data is encrypted and GDPR compliant.",
    "Your information may be retained indefinitely.",
    "Content may be used to train machine learning models.",
    "Thank you for choosing our service.",
    "Notwithstanding the foregoing, the parties agree as follows.",
];

const CRITICAL_CLAUSES: &[&str] = &[
    "We may share your information with third parties.",
    "All disputes are subject to binding arbitration.",
    "Additional fees may apply.",
];

const HEADINGS: &[&str] = &[
    "1. DATA COLLECTION",
    "2.1 Sharing",
    "Section 4 - Termination",
    "(a) Fees",
    "ARTICLE IX",
    "Governing Law",
    "PRIVACY POLICY",
];

/// A line of a generated policy: a heading, a clause or free text
fn policy_line() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(HEADINGS).prop_map(|s| s.to_string()),
        prop::sample::select(CLAUSES).prop_map(|s| s.to_string()),
        "[a-zA-Z ,.!?]{0,80}",
        Just(String::new()),
    ]
}

fn policy_document() -> impl Strategy<Value = String> {
    prop::collection::vec(policy_line(), 0..20).prop_map(|lines| lines.join("\n"))
}

fn whitespace() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ============================================================
    // Score bounds
    // ============================================================

    #[test]
    fn scores_stay_in_range(text in policy_document()) {
        let report = ClauseEngine::new().unwrap().analyze_text(&text);
        prop_assert!(report.risk_score <= 100);
        prop_assert!(report.transparency_score <= 100);
        if let Some(power) = &report.power_analysis {
            prop_assert!((0.0..=100.0).contains(&power.weighted_risk.overall_score));
            prop_assert!(power.structural_dark_patterns.friction_score <= 100);
            prop_assert!(power.data_commodification.risk_score <= 100);
        }
    }

    #[test]
    fn arbitrary_unicode_never_panics(text in "\\PC{0,300}") {
        let report = ClauseEngine::new().unwrap().analyze_text(&text);
        prop_assert!(report.risk_score <= 100);
        prop_assert_eq!(report.text_length, text.len());
    }

    // ============================================================
    // Empty input
    // ============================================================

    #[test]
    fn whitespace_only_is_canonical(text in whitespace()) {
        let report = ClauseEngine::new().unwrap().analyze_text(&text);
        prop_assert_eq!(report.risk_score, 0);
        prop_assert_eq!(report.transparency_score, 100);
        prop_assert!(report.risk_breakdown.is_empty());
        prop_assert!(report.dark_patterns.is_empty());
        prop_assert!(report.positive_indicators.is_empty());
        prop_assert!(report.power_analysis.is_none());
    }

    // ============================================================
    // Determinism
    // ============================================================

    #[test]
    fn analysis_is_idempotent(text in policy_document()) {
        let engine = ClauseEngine::new().unwrap().with_pattern_classifier();
        let first = engine.analyze_text(&text);
        let second = engine.analyze_text(&text);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    // ============================================================
    // Segmenter coverage
    // ============================================================

    #[test]
    fn sections_reconstruct_the_input(text in policy_document()) {
        let sections = segment_sections(&text);
        let rebuilt: String = sections.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(&rebuilt, &text);
        for (idx, section) in sections.iter().enumerate() {
            prop_assert_eq!(section.ordinal, idx + 1);
            prop_assert_eq!(&text[section.start..section.end], section.text.as_str());
        }
    }

    // ============================================================
    // Escalation
    // ============================================================

    #[test]
    fn repeating_a_critical_clause_never_lowers_risk(
        text in policy_document(),
        clause in prop::sample::select(CRITICAL_CLAUSES),
    ) {
        let engine = ClauseEngine::new().unwrap();
        let once = format!("{}\n{}", text, clause);
        let twice = format!("{}\n{}", once, clause);
        prop_assert!(engine.analyze_text(&twice).risk_score >= engine.analyze_text(&once).risk_score);
    }

    #[test]
    fn arbitration_and_data_sharing_floor_at_90(text in policy_document()) {
        let doc = format!(
            "{}\nWe may share your information with third parties.\nAll disputes are subject to binding arbitration.",
            text
        );
        let report = ClauseEngine::new().unwrap().analyze_text(&doc);
        prop_assert!(report.risk_score >= 90);
    }

    #[test]
    fn three_critical_categories_floor_at_85(text in policy_document()) {
        let doc = format!(
            "{}\nYour subscription will automatically renew.\nAdditional fees may apply.\nYou waive your right to a jury trial.",
            text
        );
        let report = ClauseEngine::new().unwrap().analyze_text(&doc);
        prop_assert!(report.risk_score >= 85);
    }
}
