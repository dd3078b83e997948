//! Data commodification: training, profiling, resale and perpetual licences

use std::collections::BTreeMap;

use shared_types::power::{CommodificationFinding, CommodificationScan};
use shared_types::CommodificationKind;

use super::structural::find_with_context;
use crate::catalog::PowerCatalog;

const CONTEXT_RADIUS: usize = 75;

pub fn risk_explanation(kind: CommodificationKind) -> &'static str {
    match kind {
        CommodificationKind::AiTraining => {
            "Your data is being used to train AI models without clear consent or compensation."
        }
        CommodificationKind::BehavioralProfiling => {
            "Your behavior patterns are being analyzed to create detailed profiles for targeting."
        }
        CommodificationKind::DataResale => {
            "Your personal information may be sold or licensed to third parties for profit."
        }
        CommodificationKind::PerpetualRights => {
            "The company claims permanent, irrevocable rights to your content and data."
        }
    }
}

pub fn scan_commodification(catalog: &PowerCatalog, text: &str) -> CommodificationScan {
    let mut patterns = BTreeMap::new();
    let mut total_weight: u32 = 0;
    let mut hidden = 0;

    for commodity in &catalog.commodification {
        let rule = &commodity.rule;
        let clauses = find_with_context(rule, text, CONTEXT_RADIUS);
        if clauses.is_empty() {
            continue;
        }
        let weight = rule.weight.unsigned_abs() * clauses.len() as u32;
        total_weight += weight;
        hidden += clauses.len();
        patterns.insert(
            rule.category.to_string(),
            CommodificationFinding {
                clause_count: clauses.len(),
                kind: commodity.kind,
                transparency_level: commodity.transparency,
                opt_out_available: commodity.opt_out_available,
                total_weight: weight,
                risk_explanation: risk_explanation(commodity.kind).to_string(),
                clauses,
            },
        );
    }

    let detected = |kind: CommodificationKind| patterns.values().any(|f| f.kind == kind);
    let risk = total_weight.min(100);

    CommodificationScan {
        total_types: patterns.len(),
        risk_score: risk,
        data_safety_score: 100 - risk,
        hidden_monetization_count: hidden,
        ai_training_detected: detected(CommodificationKind::AiTraining),
        behavioral_profiling_detected: detected(CommodificationKind::BehavioralProfiling),
        data_resale_detected: detected(CommodificationKind::DataResale),
        perpetual_licensing_detected: detected(CommodificationKind::PerpetualRights),
        assessment: commodification_level(risk).to_string(),
        patterns,
    }
}

fn commodification_level(risk: u32) -> &'static str {
    if risk >= 80 {
        "Extensive data commodification"
    } else if risk >= 60 {
        "Significant monetization of user data"
    } else if risk >= 40 {
        "Moderate data commercialization"
    } else if risk >= 20 {
        "Limited data monetization"
    } else {
        "Minimal data commodification"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use shared_types::TransparencyLevel;

    fn catalog() -> &'static PowerCatalog {
        &Catalog::builtin().unwrap().power
    }

    #[test]
    fn test_nothing_detected() {
        let scan = scan_commodification(catalog(), "We do not sell anything.");
        assert_eq!(scan.risk_score, 0);
        assert_eq!(scan.data_safety_score, 100);
        assert!(!scan.ai_training_detected);
        assert_eq!(scan.assessment, "Minimal data commodification");
    }

    #[test]
    fn test_ai_training_detected() {
        let text = "Aggregated data may be used to train machine learning models.";
        let scan = scan_commodification(catalog(), text);
        let finding = &scan.patterns["ai_training_extraction"];
        assert_eq!(finding.kind, CommodificationKind::AiTraining);
        assert_eq!(finding.transparency_level, TransparencyLevel::Hidden);
        assert!(!finding.opt_out_available);
        assert!(finding.risk_explanation.starts_with("Your data is being used to train AI"));
        assert!(scan.ai_training_detected);
        assert!(scan.risk_score >= 35);
        assert_eq!(scan.data_safety_score, 100 - scan.risk_score);
    }

    #[test]
    fn test_resale_and_risk_cap() {
        let text = "We sell your data to advertisers for marketing. ".repeat(3);
        let scan = scan_commodification(catalog(), &text);
        assert!(scan.data_resale_detected);
        assert_eq!(scan.risk_score, 100);
        assert_eq!(scan.data_safety_score, 0);
        assert_eq!(scan.assessment, "Extensive data commodification");
        assert!(scan.hidden_monetization_count >= 3);
    }
}
