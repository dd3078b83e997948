//! Damage-weighted risk
//!
//! Blends the three scans into one score. A weighted average alone would let
//! a forced-arbitration or data-ownership clause drown in an otherwise benign
//! document, so those combinations set floors.

use shared_types::power::{CommodificationScan, PowerImbalance, StructuralScan, WeightedRisk};
use shared_types::{CommodificationKind, RiskLevel, Severity};

use super::imbalance::round1;
use super::persona::PersonaProfile;

const POWER_WEIGHT: f64 = 0.35;
const COMMODIFICATION_WEIGHT: f64 = 0.30;
const STRUCTURAL_WEIGHT: f64 = 0.25;
const PERSONA_WEIGHT: f64 = 0.10;

const DICTATORSHIP_FLOOR: f64 = 85.0;
const DISPUTE_AND_DATA_FLOOR: f64 = 75.0;
const DISPUTE_FLOOR: f64 = 65.0;
const COMMODIFICATION_FLOOR: f64 = 60.0;
const CRITICAL_COMMODIFICATION: u32 = 60;
const HIGH_MANIPULATION: u32 = 60;

pub fn weighted_risk(
    imbalance: &PowerImbalance,
    structural: &StructuralScan,
    commodification: &CommodificationScan,
    persona: &PersonaProfile,
) -> WeightedRisk {
    let power_risk = power_risk(imbalance);
    let structural_risk = f64::from(structural.friction_score);
    let commodification_risk = f64::from(commodification.risk_score);

    let dispute = imbalance.breakdown.contains_key("dispute_resolution_power");
    let data_ownership = imbalance.breakdown.contains_key("data_ownership_control");
    let critical_commodification = commodification.risk_score > CRITICAL_COMMODIFICATION;

    let mut total = power_risk * POWER_WEIGHT
        + commodification_risk * COMMODIFICATION_WEIGHT
        + structural_risk * STRUCTURAL_WEIGHT
        + persona.risk_modifier * PERSONA_WEIGHT;

    if imbalance.digital_dictatorship {
        total = total.max(DICTATORSHIP_FLOOR);
    } else if dispute && (data_ownership || critical_commodification) {
        total = total.max(DISPUTE_AND_DATA_FLOOR);
    } else if dispute {
        total = total.max(DISPUTE_FLOOR);
    } else if critical_commodification {
        total = total.max(COMMODIFICATION_FLOOR);
    }

    WeightedRisk {
        overall_score: round1(total),
        risk_level: risk_level(total),
        assessment: risk_assessment(total).to_string(),
        power_risk: round1(power_risk),
        structural_risk: round1(structural_risk),
        commodification_risk: round1(commodification_risk),
        persona_modifier: persona.risk_modifier,
        high_damage_clauses: high_damage_clauses(imbalance, structural, commodification),
        critical_issues: critical_issues(imbalance, structural, commodification),
        escalation_triggered: imbalance.digital_dictatorship || (dispute && data_ownership),
    }
}

fn power_risk(imbalance: &PowerImbalance) -> f64 {
    let excess = ((imbalance.company_power_percentage - 50.0) * 1.2).max(0.0);
    (excess + 5.0 * imbalance.control_mechanisms_detected as f64).min(100.0)
}

fn risk_level(score: f64) -> RiskLevel {
    if score >= 75.0 {
        RiskLevel::Critical
    } else if score >= 60.0 {
        RiskLevel::High
    } else if score >= 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn risk_assessment(score: f64) -> &'static str {
    if score >= 75.0 {
        "Critical Risk - Avoid if possible"
    } else if score >= 60.0 {
        "High Risk - Proceed with extreme caution"
    } else if score >= 40.0 {
        "Moderate Risk - Review carefully"
    } else {
        "Acceptable Risk - Standard precautions apply"
    }
}

fn high_damage_clauses(
    imbalance: &PowerImbalance,
    structural: &StructuralScan,
    commodification: &CommodificationScan,
) -> Vec<String> {
    let power = imbalance
        .breakdown
        .iter()
        .filter(|(_, b)| b.impact == Severity::Critical)
        .map(|(category, _)| format!("Critical power imbalance: {}", category));
    let manipulation = structural
        .patterns
        .iter()
        .filter(|(_, f)| f.damage_level == Severity::Critical)
        .map(|(category, _)| format!("Critical structural manipulation: {}", category));
    let data = commodification
        .patterns
        .iter()
        .filter(|(_, f)| {
            matches!(f.kind, CommodificationKind::AiTraining | CommodificationKind::DataResale)
        })
        .map(|(category, _)| format!("Data commodification: {}", category));

    power.chain(manipulation).chain(data).collect()
}

fn critical_issues(
    imbalance: &PowerImbalance,
    structural: &StructuralScan,
    commodification: &CommodificationScan,
) -> Vec<String> {
    let mut issues = Vec::new();
    if imbalance.digital_dictatorship {
        issues.push("Digital dictatorship detected - extreme power imbalance".to_string());
    }
    if commodification.ai_training_detected {
        issues.push("AI training on user data without clear consent".to_string());
    }
    if structural.manipulation_score > HIGH_MANIPULATION {
        issues.push("High structural manipulation score".to_string());
    }
    issues
}
