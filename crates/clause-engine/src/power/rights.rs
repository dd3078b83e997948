//! Rights stripping, compound traps and transparency empowerment

use std::collections::{BTreeMap, BTreeSet};

use shared_types::power::{
    CompoundTrap, EmpowermentAssessment, RightsStrippingIndex, RightsViolation,
};
use shared_types::{Persona, Severity};

use super::imbalance::round1;
use super::persona::profile;
use crate::catalog::PowerCatalog;
use crate::segmenter::{truncate_chars, Sentence};

const EXAMPLE_CHARS: usize = 100;
const RED_FLAG_BALANCE: f64 = 4.0;
const REAL_TRANSPARENCY_FROM: u32 = 60;

struct TrapSpec {
    name: &'static str,
    categories: &'static [&'static str],
    description: &'static str,
}

/// Named combinations of clause categories that together leave users with
/// no recourse, matched against the rights-erosion categories detected.
const COMPOUND_TRAPS: &[TrapSpec] = &[
    TrapSpec {
        name: "digital_dictatorship",
        categories: &["unilateral_changes", "due_process", "irreversible_consequences"],
        description: "Complete erosion of user rights and legal recourse",
    },
    TrapSpec {
        name: "data_hostage",
        categories: &["data_control", "privacy_rights", "irreversible_consequences"],
        description: "User data held hostage with no meaningful control or deletion",
    },
    TrapSpec {
        name: "legal_immunity",
        categories: &["due_process", "liability_limitation", "unilateral_changes"],
        description: "Company shields itself from all legal accountability",
    },
];

pub fn rights_stripping(
    catalog: &PowerCatalog,
    sentences: &[Sentence<'_>],
    persona: Persona,
) -> RightsStrippingIndex {
    let persona_profile = profile(persona);
    let mut violations: BTreeMap<String, RightsViolation> = BTreeMap::new();
    let mut total = 0.0;

    for sentence in sentences {
        for rule in catalog.rights_erosion.iter() {
            let severity = rule.weight.unsigned_abs();
            for re in &rule.expressions {
                if !re.is_match(sentence.text) {
                    continue;
                }
                let violation = violations
                    .entry(rule.category.to_string())
                    .or_insert_with(|| RightsViolation {
                        count: 0,
                        severity,
                        description: rule.description.to_string(),
                        examples: Vec::new(),
                    });
                violation.count += 1;
                violation
                    .examples
                    .push(truncate_chars(sentence.text, EXAMPLE_CHARS));

                total += if persona_profile.is_high_risk(rule.category) {
                    f64::from(severity) * persona_profile.multiplier
                } else {
                    f64::from(severity)
                };
            }
        }
    }

    let max_severity: u32 = catalog
        .rights_erosion
        .iter()
        .map(|r| r.weight.unsigned_abs())
        .sum::<u32>()
        * 3;
    let balance = if max_severity > 0 {
        (10.0 - total / f64::from(max_severity) * 9.0).max(1.0)
    } else {
        10.0
    };

    let detected: BTreeSet<&str> = violations.keys().map(String::as_str).collect();
    let label = persona.label();
    let persona_risk_assessment = if persona_profile
        .high_risk_categories
        .iter()
        .any(|c| detected.contains(c))
    {
        format!(
            "HIGH RISK: As a {}, {} - critical violations detected",
            label, persona_profile.description
        )
    } else {
        format!("Moderate risk for {} use case", label)
    };

    RightsStrippingIndex {
        total_severity_score: round1(total),
        rights_vs_control_balance: round1(balance),
        categories_detected: detected.iter().map(|c| c.to_string()).collect(),
        red_flag_triggered: balance < RED_FLAG_BALANCE,
        persona_risk_assessment,
        compound_traps: compound_traps(&detected),
        violations,
    }
}

/// Traps with at least two thirds of their categories present
pub fn compound_traps(detected: &BTreeSet<&str>) -> Vec<CompoundTrap> {
    COMPOUND_TRAPS
        .iter()
        .filter_map(|trap| {
            let present: Vec<String> = trap
                .categories
                .iter()
                .filter(|c| detected.contains(*c))
                .map(|c| c.to_string())
                .collect();
            if present.is_empty() || present.len() * 3 < trap.categories.len() * 2 {
                return None;
            }
            let completion = present.len() as f64 / trap.categories.len() as f64;
            Some(CompoundTrap {
                name: trap.name.to_string(),
                detected_categories: present,
                completion_percentage: round1(completion * 100.0),
                severity: if completion > 0.8 {
                    Severity::Critical
                } else {
                    Severity::High
                },
                description: trap.description.to_string(),
            })
        })
        .collect()
}

/// Informed control: notice, opt-out, deletion and comparison, 25 points each
pub fn empowerment(catalog: &PowerCatalog, text: &str) -> EmpowermentAssessment {
    let mut score = 0;
    let mut factors = BTreeMap::new();
    for rule in catalog.empowerment.iter() {
        let present = rule.is_match(text);
        if present {
            score += rule.weight.unsigned_abs();
        }
        factors.insert(rule.category.to_string(), present);
    }

    let assessment = if score > 75 {
        "High transparency with meaningful user control"
    } else if score > 50 {
        "Moderate transparency with some user empowerment"
    } else if score > 25 {
        "Limited transparency - minimal user control"
    } else {
        "Low transparency - users lack meaningful choices"
    };

    EmpowermentAssessment {
        score,
        factors,
        real_transparency: score > REAL_TRANSPARENCY_FROM,
        assessment: assessment.to_string(),
    }
}
