//! Explanatory flags
//!
//! Every company-held control clause, structural match and commodification
//! match becomes a quoted flag with a plain-language explanation, the impact
//! on the user and what they can do about it.

use std::collections::BTreeMap;

use shared_types::power::{CommodificationScan, FlagReport, PowerImbalance, StructuralScan};
use shared_types::{CommodificationKind, Flag, FlagCategory, PowerHolder, Severity};

use super::commodification::risk_explanation;
use crate::scoring::category_label;

struct FlagText {
    explanation: &'static str,
    impact: &'static str,
    mitigation: &'static str,
}

const fn text(explanation: &'static str, impact: &'static str, mitigation: &'static str) -> FlagText {
    FlagText {
        explanation,
        impact,
        mitigation,
    }
}

fn control_text(category: &str) -> Option<FlagText> {
    Some(match category {
        "rule_modification_power" => text(
            "The company can rewrite these terms whenever it chooses",
            "The agreement you accept today may not be the one that binds you tomorrow",
            "Keep a dated copy of the terms and watch for change notices",
        ),
        "data_ownership_control" => text(
            "The company claims ownership of, or sweeping licences over, your data",
            "You may lose control over what happens to your content and information",
            "Avoid uploading anything you would not want the company to keep",
        ),
        "termination_power" => text(
            "The company can close or suspend your account at its discretion",
            "You could lose access to the service and your data without warning",
            "Keep independent backups of anything stored in the service",
        ),
        "dispute_resolution_power" => text(
            "The company decides how and where disputes with you are resolved",
            "You may be unable to take the company to court or join a class action",
            "Look for an arbitration opt-out window and use it promptly",
        ),
        _ => return None,
    })
}

fn structural_text(category: &str) -> Option<FlagText> {
    Some(match category {
        "exit_friction" => text(
            "Leaving requires extra steps, manual requests or long waiting periods",
            "Cancelling or deleting your account takes far more effort than signing up",
            "Document every cancellation request and keep the confirmations",
        ),
        "data_retention_trap" => text(
            "Your data can be kept after you leave, possibly indefinitely",
            "Deleting your account may not delete your information",
            "Request deletion in writing and ask exactly what is retained",
        ),
        "asymmetric_obligations" => text(
            "You carry obligations the company does not take on itself",
            "A mistake on your side can cost you the account or make you liable",
            "Check what you must provide or indemnify before agreeing",
        ),
        "modification_asymmetry" => text(
            "Only the company may change the deal, and continued use counts as acceptance",
            "Using the service binds you to changes you may never have read",
            "Review the terms periodically and stop using the service if changes are unacceptable",
        ),
        _ => return None,
    })
}

fn commodification_text(kind: CommodificationKind) -> (&'static str, &'static str) {
    match kind {
        CommodificationKind::AiTraining => (
            "Your content and behaviour may shape models you never agreed to train",
            "Look for an AI training opt-out in the privacy settings",
        ),
        CommodificationKind::BehavioralProfiling => (
            "Detailed profiles of your activity can be used to target you",
            "Limit tracking through privacy settings and browser controls",
        ),
        CommodificationKind::DataResale => (
            "Your information can end up with companies you have never dealt with",
            "Use your privacy request rights to opt out of sale or sharing",
        ),
        CommodificationKind::PerpetualRights => (
            "The company keeps rights to your content even after you leave",
            "Avoid uploading original work you want to keep control of",
        ),
    }
}

fn commodification_severity(kind: CommodificationKind) -> Severity {
    match kind {
        CommodificationKind::AiTraining | CommodificationKind::DataResale => Severity::Critical,
        CommodificationKind::BehavioralProfiling | CommodificationKind::PerpetualRights => {
            Severity::High
        }
    }
}

pub fn risk_rating(severity: Severity) -> u8 {
    match severity {
        Severity::Critical => 10,
        Severity::High => 8,
        Severity::Medium => 5,
        Severity::Low => 2,
    }
}

pub fn explanatory_flags(
    imbalance: &PowerImbalance,
    structural: &StructuralScan,
    commodification: &CommodificationScan,
) -> FlagReport {
    let mut flags: Vec<Flag> = Vec::new();

    for (category, breakdown) in &imbalance.breakdown {
        if breakdown.primary_holder != PowerHolder::Company {
            continue;
        }
        let label = category_label(category);
        let (explanation, impact, mitigation) = match control_text(category) {
            Some(t) => (t.explanation.to_string(), t.impact.to_string(), t.mitigation.to_string()),
            None => (
                format!("The company holds control over {}", label.to_lowercase()),
                format!("This clause limits your control over {}", label.to_lowercase()),
                "Consider negotiating these terms or choosing an alternative".to_string(),
            ),
        };
        for clause in &breakdown.clauses {
            flags.push(Flag {
                flag_id: format!("power_{}_{}", category, flags.len()),
                category: FlagCategory::PowerImbalance,
                severity: breakdown.impact,
                quoted_text: clause.text.clone(),
                explanation: explanation.clone(),
                risk_rating: risk_rating(breakdown.impact),
                user_impact: impact.clone(),
                mitigation: mitigation.clone(),
            });
        }
    }

    for (category, finding) in &structural.patterns {
        let (explanation, impact, mitigation) = match structural_text(category) {
            Some(t) => (t.explanation.to_string(), t.impact.to_string(), t.mitigation.to_string()),
            None => (
                format!("Structural dark pattern detected: {}", category_label(category)),
                format!("This creates {} for users", finding.manipulation_type.replace('_', " ")),
                "Be aware of this pattern before relying on the service".to_string(),
            ),
        };
        for clause in &finding.clauses {
            flags.push(Flag {
                flag_id: format!("structural_{}_{}", category, flags.len()),
                category: FlagCategory::StructuralManipulation,
                severity: finding.damage_level,
                quoted_text: clause.context.clone(),
                explanation: explanation.clone(),
                risk_rating: risk_rating(finding.damage_level),
                user_impact: impact.clone(),
                mitigation: mitigation.clone(),
            });
        }
    }

    for (category, finding) in &commodification.patterns {
        let severity = commodification_severity(finding.kind);
        let (impact, mitigation) = commodification_text(finding.kind);
        for clause in &finding.clauses {
            flags.push(Flag {
                flag_id: format!("commodity_{}_{}", category, flags.len()),
                category: FlagCategory::DataCommodification,
                severity,
                quoted_text: clause.context.clone(),
                explanation: risk_explanation(finding.kind).to_string(),
                risk_rating: risk_rating(severity),
                user_impact: impact.to_string(),
                mitigation: mitigation.to_string(),
            });
        }
    }

    let mut by_severity: BTreeMap<Severity, Vec<String>> = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ]
    .into_iter()
    .map(|s| (s, Vec::new()))
    .collect();
    for flag in &flags {
        by_severity
            .entry(flag.severity)
            .or_default()
            .push(flag.flag_id.clone());
    }

    let count = |s: Severity| by_severity.get(&s).map_or(0, Vec::len);
    let critical = count(Severity::Critical);
    let high = count(Severity::High);
    let medium = count(Severity::Medium);
    let low = count(Severity::Low);

    let summary = if critical > 0 {
        format!("{} critical and {} high-risk flags detected", critical, high)
    } else if high > 0 {
        format!("{} high-risk flags detected", high)
    } else {
        "No critical issues detected".to_string()
    };

    let recommended_action = if critical > 2 {
        "Strong recommendation: Avoid this service due to multiple critical issues"
    } else if critical > 0 {
        "Caution: Critical issues detected, proceed with extreme care"
    } else if high > 3 {
        "Warning: Multiple high-risk issues, consider alternatives"
    } else {
        "Acceptable with standard precautions"
    };

    FlagReport {
        total_flags: flags.len(),
        flags,
        by_severity,
        critical_flag_count: critical,
        high_flag_count: high,
        medium_flag_count: medium,
        low_flag_count: low,
        summary,
        recommended_action: recommended_action.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, PowerCatalog};
    use crate::power::commodification::scan_commodification;
    use crate::power::imbalance::power_imbalance;
    use crate::power::structural::scan_structural;
    use crate::segmenter::split_sentences;

    fn catalog() -> &'static PowerCatalog {
        &Catalog::builtin().unwrap().power
    }

    fn flags_for(text: &str) -> FlagReport {
        let catalog = catalog();
        explanatory_flags(
            &power_imbalance(catalog, &split_sentences(text)),
            &scan_structural(catalog, text),
            &scan_commodification(catalog, text),
        )
    }

    #[test]
    fn test_clean_text_has_no_flags() {
        let report = flags_for("Thanks for using our friendly service.");
        assert_eq!(report.total_flags, 0);
        assert_eq!(report.by_severity.len(), 4);
        assert_eq!(report.summary, "No critical issues detected");
        assert_eq!(report.recommended_action, "Acceptable with standard precautions");
    }

    #[test]
    fn test_company_control_clause_is_flagged() {
        let report = flags_for("You waive your right to a jury trial.");
        assert_eq!(report.total_flags, 1);
        let flag = &report.flags[0];
        assert_eq!(flag.flag_id, "power_dispute_resolution_power_0");
        assert_eq!(flag.category, FlagCategory::PowerImbalance);
        assert_eq!(flag.severity, Severity::Critical);
        assert_eq!(flag.risk_rating, 10);
        assert_eq!(flag.quoted_text, "You waive your right to a jury trial");
        assert_eq!(report.by_severity[&Severity::Critical], vec![flag.flag_id.clone()]);
        assert_eq!(report.summary, "1 critical and 0 high-risk flags detected");
        assert_eq!(
            report.recommended_action,
            "Caution: Critical issues detected, proceed with extreme care"
        );
    }

    #[test]
    fn test_user_empowerment_is_not_flagged() {
        let report = flags_for("You have the right to opt out of marketing emails.");
        assert_eq!(report.total_flags, 0);
    }

    #[test]
    fn test_commodification_flag_quotes_context() {
        let text = "Aggregated data may be used to train machine learning models.";
        let report = flags_for(text);
        let flag = report
            .flags
            .iter()
            .find(|f| f.category == FlagCategory::DataCommodification)
            .unwrap();
        assert!(flag.flag_id.starts_with("commodity_ai_training_extraction_"));
        assert_eq!(flag.quoted_text, text);
        assert_eq!(flag.severity, Severity::Critical);
    }

    #[test]
    fn test_flag_ids_are_unique() {
        let text = "We own all your data and content. You waive your right to a jury trial. \
                    Your information may be retained indefinitely. \
                    We sell your data to advertisers for marketing.";
        let report = flags_for(text);
        let mut ids: Vec<&str> = report.flags.iter().map(|f| f.flag_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), report.total_flags);
        assert!(report.critical_flag_count >= 3);
        assert_eq!(
            report.recommended_action,
            "Strong recommendation: Avoid this service due to multiple critical issues"
        );
    }
}
