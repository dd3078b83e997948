//! End-to-end analyses of short policy excerpts
//!
//! Each test runs the full engine over realistic text and checks the parts
//! of the report a reader would act on.

use clause_engine::{ClauseEngine, ScoringPolicy};
use pretty_assertions::assert_eq;
use shared_types::{ClassificationMethod, Persona, PowerHolder, Provenance, RiskLevel};

fn engine() -> ClauseEngine {
    ClauseEngine::new().expect("builtin catalog compiles")
}

// ============================================================
// Reference documents
// ============================================================

#[test]
fn data_sharing_with_arbitration_hits_combination_floor() {
    let text = "We may share your personal information with third parties. \
                You waive your right to a jury trial and agree to binding arbitration.";
    let report = engine().analyze_text(text);

    assert!(report.risk_breakdown.contains_key("data_sharing"));
    assert!(report.risk_breakdown.contains_key("arbitration_waiver"));
    assert!(report.risk_score >= 90, "risk_score = {}", report.risk_score);
    assert_eq!(report.executive_summary.risk_level, RiskLevel::High);

    let power = report.power_analysis.expect("power analysis for non-empty text");
    assert!(!power.power_imbalance.digital_dictatorship);
    assert!(
        power.power_imbalance.company_power_percentage > 70.0,
        "company power = {}",
        power.power_imbalance.company_power_percentage
    );
    assert_eq!(power.power_flow.dispute_resolution, PowerHolder::Company);
}

#[test]
fn user_friendly_policy_scores_transparent() {
    let text = "You have the right to access your personal data and may request deletion at any time. \
                We will notify you in advance of any changes.";
    let report = engine().analyze_text(text);

    assert!(report.risk_breakdown.is_empty());
    assert!(report.dark_patterns.is_empty());
    assert!(report.positive_indicators.contains_key("user_rights"));
    assert!(report.positive_indicators.contains_key("transparency"));
    assert!(report.transparency_score > 80);
    assert_eq!(report.risk_score, 0);
}

#[test]
fn numbered_heading_titles_the_section() {
    let text = "1. DATA COLLECTION\nWe may share your information with third parties.\n";
    let report = engine().analyze_text(text);

    assert_eq!(report.section_count, 1);
    assert_eq!(report.flagged_sections.len(), 1);
    let section = &report.flagged_sections[0];
    assert_eq!(section.title, "Data Collection");
    assert_eq!(section.section, 1);
    assert_eq!(report.risk_breakdown["data_sharing"].matches[0].section, Some(1));
}

// ============================================================
// Escalation
// ============================================================

#[test]
fn three_critical_categories_reach_85() {
    let text = "Your subscription will automatically renew each month. \
                Additional fees may apply at checkout. \
                Your data may be disclosed to partners.";
    let report = engine().analyze_text(text);

    assert!(report.dark_patterns.contains_key("auto_renewal"));
    assert!(report.dark_patterns.contains_key("hidden_costs"));
    assert!(report.risk_breakdown.contains_key("data_sharing"));
    assert!(report.risk_score >= 85, "risk_score = {}", report.risk_score);
    assert!(report
        .executive_summary
        .critical_issues
        .iter()
        .any(|issue| issue.kind == "Auto Renewal"));
}

#[test]
fn arbitration_alone_is_at_least_75() {
    let report = engine().analyze_text("All disputes are subject to binding arbitration.");
    assert_eq!(report.risk_breakdown["arbitration_waiver"].count, 1);
    assert_eq!(report.risk_score, 75);
}

#[test]
fn toml_policy_overrides_floors() {
    let policy: ScoringPolicy = toml::from_str(
        r#"
        critical_floors = []
        safety_net_base = 0.0

        [combinations]
        arbitration_only = 40.0
        "#,
    )
    .expect("valid policy");
    let report = engine()
        .with_policy(policy)
        .analyze_text("All disputes are subject to binding arbitration.");
    // additive 25, lifted only by the relaxed combination floor
    assert_eq!(report.risk_score, 40);
}

// ============================================================
// Classifier fallback
// ============================================================

#[test]
fn classifier_matches_merge_with_pattern_matches() {
    let text = "All disputes are subject to binding arbitration. \
                Claims shall be resolved exclusively through arbitration on an individual basis.";
    let plain = engine().analyze_text(text);
    let enhanced = engine().with_pattern_classifier().analyze_text(text);

    assert_eq!(plain.classification.method, ClassificationMethod::Patterns);
    assert_eq!(enhanced.classification.method, ClassificationMethod::EnhancedPatterns);

    let before = &plain.risk_breakdown["arbitration_waiver"];
    let after = &enhanced.risk_breakdown["arbitration_waiver"];
    assert_eq!(before.provenance, Provenance::Pattern);
    assert_eq!(after.provenance, Provenance::Merged);
    assert!(after.count > before.count);
    assert!(enhanced.risk_score >= plain.risk_score);
    assert!(enhanced
        .classification
        .confidence_scores
        .contains_key("arbitration_waiver"));
}

#[test]
fn unavailable_classifier_reports_patterns() {
    let report = engine().analyze_text("We may share your information with third parties.");
    assert_eq!(report.classification.method, ClassificationMethod::Patterns);
    assert_eq!(report.classification.sentences_processed, 0);
    assert!(report.classification.confidence_scores.is_empty());
}

// ============================================================
// Personas
// ============================================================

#[test]
fn persona_changes_only_the_power_analysis() {
    let text = "We may terminate your account at any time. You waive your right to a jury trial.";
    let individual = engine().analyze(text, Persona::IndividualUser);
    let business = engine().analyze(text, Persona::SmallBusiness);

    assert_eq!(individual.risk_score, business.risk_score);
    assert_eq!(individual.risk_breakdown, business.risk_breakdown);

    let individual_power = individual.power_analysis.unwrap();
    let business_power = business.power_analysis.unwrap();
    assert!(
        business_power.rights_stripping.total_severity_score
            > individual_power.rights_stripping.total_severity_score
    );
    assert_eq!(business_power.user_persona, Persona::SmallBusiness);
}

#[test]
fn report_serializes_with_power_analysis() {
    let report = engine().analyze_text("We own all your data and content.");
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["user_persona"], "individual_user");
    assert!(json["power_analysis"]["weighted_risk"]["overall_score"].is_number());
}
