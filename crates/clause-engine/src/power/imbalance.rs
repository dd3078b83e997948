//! Power-imbalance scoring and the power-flow map

use std::collections::BTreeMap;

use shared_types::power::{ControlBreakdown, PowerImbalance};
use shared_types::{PowerClause, PowerFlowMap, PowerHolder};

use crate::catalog::{FlowDecision, PowerCatalog};
use crate::confidence;
use crate::segmenter::Sentence;

/// Contracts are drafted by the company, so it starts ahead
const BASE_COMPANY_POWER: f64 = 60.0;
const MAX_COMPANY_POWER: f64 = 95.0;
const MIN_USER_POWER: f64 = 5.0;
const USER_POWER_CAP: f64 = 25.0;
const CAPPED_COMPANY_POWER: f64 = 75.0;
const DICTATORSHIP_COMPANY_POWER: f64 = 85.0;
const DICTATORSHIP_USER_POINTS: u32 = 10;

/// The user can walk away from anything except these
const NO_EXIT_CATEGORIES: &[&str] = &["dispute_resolution_power", "data_ownership_control"];

pub fn power_imbalance(catalog: &PowerCatalog, sentences: &[Sentence<'_>]) -> PowerImbalance {
    let mut breakdown = BTreeMap::new();
    let mut company_points: u32 = 0;
    let mut user_points: u32 = 0;
    let mut mechanisms = 0;

    for control in &catalog.control {
        let rule = &control.rule;
        let mut clauses = Vec::new();
        let mut power_score = 0;

        for sentence in sentences {
            let hits = rule.expression_hits(sentence.text);
            for re in &rule.expressions {
                let Some(m) = re.find(sentence.text) else {
                    continue;
                };
                clauses.push(PowerClause {
                    text: sentence.text.to_string(),
                    power_holder: control.holder,
                    reversible: control.holder == PowerHolder::User,
                    negotiable: matches!(control.holder, PowerHolder::User | PowerHolder::Shared),
                    user_can_exit: !NO_EXIT_CATEGORIES.contains(&rule.category),
                    impact_level: rule.severity,
                    confidence: confidence::score(
                        rule.confidence_base,
                        m.as_str().chars().count(),
                        sentence.text,
                        hits,
                    ),
                });
                power_score += rule.weight;
                if control.holder == PowerHolder::Company {
                    company_points += rule.weight.unsigned_abs();
                } else {
                    user_points += rule.weight.unsigned_abs();
                }
            }
        }

        if !clauses.is_empty() {
            mechanisms += clauses.len();
            breakdown.insert(
                rule.category.to_string(),
                ControlBreakdown {
                    clause_count: clauses.len(),
                    power_score,
                    primary_holder: control.holder,
                    impact: rule.severity,
                    clauses,
                },
            );
        }
    }

    let mut company = (BASE_COMPANY_POWER + f64::from(company_points) / 4.0).min(MAX_COMPANY_POWER);
    let mut user = (100.0 - company + f64::from(user_points) / 3.0).max(MIN_USER_POWER);
    if user > USER_POWER_CAP {
        user = USER_POWER_CAP;
        company = CAPPED_COMPANY_POWER;
    }
    let dictatorship = company > DICTATORSHIP_COMPANY_POWER && user_points < DICTATORSHIP_USER_POINTS;

    PowerImbalance {
        company_power_percentage: round1(company),
        user_power_percentage: round1(user),
        power_imbalance_score: round1((company - user).abs()),
        digital_dictatorship: dictatorship,
        control_mechanisms_detected: mechanisms,
        breakdown,
        company_power_points: company_points,
        user_power_points: user_points,
        assessment: power_assessment(company, dictatorship).to_string(),
    }
}

fn power_assessment(company: f64, dictatorship: bool) -> &'static str {
    if dictatorship {
        "Digital Dictatorship: Company has absolute control"
    } else if company > 85.0 {
        "Heavily Company-Favored: Significant power imbalance"
    } else if company > 75.0 {
        "Company-Favored: Notable power imbalance"
    } else if company > 65.0 {
        "Moderately Company-Favored: Some imbalance"
    } else {
        "Reasonably Balanced: Acceptable power distribution"
    }
}

/// Who holds each key decision. Later sentences override earlier ones.
pub fn power_flow(catalog: &PowerCatalog, sentences: &[Sentence<'_>]) -> PowerFlowMap {
    let mut map = PowerFlowMap::default();

    for sentence in sentences {
        for rule in &catalog.flow {
            let holder = if rule.company.iter().any(|re| re.is_match(sentence.text)) {
                PowerHolder::Company
            } else if rule.alternative.iter().any(|re| re.is_match(sentence.text)) {
                rule.alternative_holder
            } else {
                continue;
            };
            let slot = match rule.decision {
                FlowDecision::RuleChanges => &mut map.rule_changes,
                FlowDecision::ServiceTermination => &mut map.service_termination,
                FlowDecision::DataOwnership => &mut map.data_ownership,
                FlowDecision::DisputeResolution => &mut map.dispute_resolution,
            };
            *slot = holder;
        }
    }
    map
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::segmenter::split_sentences;

    fn catalog() -> &'static PowerCatalog {
        &Catalog::builtin().unwrap().power
    }

    #[test]
    fn test_no_clauses_caps_user_power() {
        let imbalance = power_imbalance(catalog(), &[]);
        // 60 / 40 before the cap
        assert_eq!(imbalance.company_power_percentage, 75.0);
        assert_eq!(imbalance.user_power_percentage, 25.0);
        assert_eq!(imbalance.power_imbalance_score, 50.0);
        assert!(!imbalance.digital_dictatorship);
        assert_eq!(imbalance.assessment, "Moderately Company-Favored: Some imbalance");
    }

    #[test]
    fn test_jury_waiver_is_company_dispute_power() {
        let text = "You waive your right to a jury trial.";
        let imbalance = power_imbalance(catalog(), &split_sentences(text));
        let dispute = &imbalance.breakdown["dispute_resolution_power"];
        assert_eq!(dispute.clause_count, 1);
        assert_eq!(dispute.power_score, 40);
        let clause = &dispute.clauses[0];
        assert_eq!(clause.power_holder, PowerHolder::Company);
        assert!(!clause.user_can_exit);
        assert!(!clause.negotiable);
        assert_eq!(imbalance.company_power_points, 40);
        assert_eq!(imbalance.control_mechanisms_detected, 1);
    }

    #[test]
    fn test_heavy_company_control_is_dictatorship() {
        let text = "We may terminate your account at our sole discretion without notice. \
                    We own all your data and content. \
                    All disputes shall be resolved by binding arbitration. \
                    You waive your right to a jury trial. \
                    We may modify these terms at any time without notice.";
        let imbalance = power_imbalance(catalog(), &split_sentences(text));
        assert!(imbalance.company_power_points >= 120);
        assert_eq!(imbalance.company_power_percentage, 95.0);
        assert_eq!(imbalance.user_power_percentage, 5.0);
        assert!(imbalance.digital_dictatorship);
        assert_eq!(imbalance.assessment, "Digital Dictatorship: Company has absolute control");
    }

    #[test]
    fn test_user_empowerment_counts_for_user() {
        let text = "You have the right to opt out of marketing emails.";
        let imbalance = power_imbalance(catalog(), &split_sentences(text));
        let empowerment = &imbalance.breakdown["user_empowerment"];
        assert_eq!(empowerment.primary_holder, PowerHolder::User);
        assert!(empowerment.power_score < 0);
        assert!(empowerment.clauses[0].reversible);
        assert_eq!(imbalance.company_power_points, 0);
        assert_eq!(imbalance.user_power_points, 15);
    }

    #[test]
    fn test_power_flow_map() {
        let text = "We may terminate your account at any time. \
                    You may cancel your account whenever you like. \
                    All disputes are settled through binding arbitration.";
        let map = power_flow(catalog(), &split_sentences(text));
        // the cancel sentence comes later and holds the alternative
        assert_eq!(map.service_termination, PowerHolder::Shared);
        assert_eq!(map.dispute_resolution, PowerHolder::Company);
        assert_eq!(map.rule_changes, PowerHolder::Unclear);
        assert_eq!(map.data_ownership, PowerHolder::Unclear);
    }
}
