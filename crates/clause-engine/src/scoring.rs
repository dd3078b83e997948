//! Risk aggregation
//!
//! Turns the merged category maps into the risk score, the transparency
//! score and the executive summary. The additive model alone lets a few
//! severe clauses hide behind a low total, so escalation and combination
//! floors lift the score whenever critical categories are present.

use shared_types::{CategoryMap, CategoryResult, ExecutiveSummary, RiskLevel, Severity, SummaryIssue};
use tracing::debug;

use crate::error::SummaryError;
use crate::policy::{Floor, ScoringPolicy};
use crate::segmenter::title_case;

/// Plain-language impact and advice for the best-known risk categories
const RISK_IMPACTS: &[(&str, &str, &str)] = &[
    (
        "data_sharing",
        "Your personal data will be sold or shared with unknown third parties",
        "DO NOT PROCEED unless you accept permanent loss of data privacy",
    ),
    (
        "arbitration_waiver",
        "You cannot sue this company in court, even for serious harm",
        "STOP - You lose all legal recourse if something goes wrong",
    ),
    (
        "unilateral_changes",
        "Company can change rules anytime without asking your permission",
        "Monitor for changes or set up alerts",
    ),
    (
        "account_suspension",
        "Company can ban you instantly without explanation or appeal",
        "Ensure you have data backups before proceeding",
    ),
    (
        "broad_liability_waiver",
        "Company takes no responsibility if their service harms you",
        "Consider if the risk is worth the service benefits",
    ),
];

/// Follow-up steps keyed to specific findings
const CATEGORY_NEXT_STEPS: &[(&str, &str)] = &[
    ("arbitration_waiver", "Remember: You cannot sue in court if problems arise"),
    ("data_sharing", "Check privacy settings immediately after signing up"),
    ("unilateral_changes", "Set up alerts for this company's policy changes"),
    ("auto_renewal", "Cancel subscription immediately if you ever want to stop"),
];

const DEFAULT_NEXT_STEPS: &[&str] = &[
    "Keep screenshots of the current terms",
    "Monitor your account for unexpected changes",
    "Know your cancellation process before you need it",
];

pub struct RiskAggregator<'p> {
    policy: &'p ScoringPolicy,
}

impl<'p> RiskAggregator<'p> {
    pub fn new(policy: &'p ScoringPolicy) -> Self {
        Self { policy }
    }

    /// Severity-weighted risk score in `[0, 100]`.
    ///
    /// Dark patterns are scored alongside risk categories; critical ones
    /// such as hidden costs count toward the escalation floors.
    pub fn risk_score(&self, risk: &CategoryMap, dark_patterns: &CategoryMap) -> u8 {
        let policy = self.policy;
        let mut total = 0.0;
        let mut critical_count = 0;
        let mut high_count = 0;

        for (category, result) in risk.iter().chain(dark_patterns) {
            let severity = policy.severity_class(category);
            let weight = policy.base_weight(severity);
            total += if result.count > 1 {
                weight * (1.0 + policy.additional_occurrence_factor * (result.count - 1) as f64)
            } else {
                weight
            };
            match severity {
                Severity::Critical => critical_count += result.count,
                Severity::High => high_count += result.count,
                _ => {}
            }
        }

        let floor = first_floor(&policy.critical_floors, critical_count)
            .or_else(|| first_floor(&policy.high_floors, high_count));
        if let Some(floor) = floor {
            total = total.max(floor);
        }

        let combos = &policy.combinations;
        let data_sharing = risk.contains_key(&combos.data_sharing_category);
        let arbitration = risk.contains_key(&combos.arbitration_category);
        total = match (data_sharing, arbitration) {
            (true, true) => total.max(combos.both),
            (false, true) => total.max(combos.arbitration_only),
            (true, false) => total.max(combos.data_sharing_only),
            (false, false) => total,
        };

        let mut score = total.clamp(0.0, 100.0);
        if critical_count > 0 && score < policy.safety_net_base {
            score = (policy.safety_net_base + policy.safety_net_step * critical_count as f64)
                .min(100.0);
        }

        debug!(
            total,
            critical_count, high_count, score, "risk score aggregated"
        );
        score as u8
    }

    /// Transparency in `[0, 100]`: dark patterns and risk pull it down,
    /// positive indicators add a capped bonus
    pub fn transparency_score(
        &self,
        risk_score: u8,
        dark_patterns: &CategoryMap,
        positive: &CategoryMap,
    ) -> u8 {
        let weights = &self.policy.transparency;
        let base = 100.0
            - weights.dark_pattern_penalty * dark_patterns.len() as f64
            - weights.risk_factor * f64::from(risk_score);
        let bonus = (weights.positive_bonus * positive.len() as f64).min(weights.positive_bonus_cap);
        (base + bonus).clamp(0.0, 100.0) as u8
    }

    pub fn risk_level(&self, risk_score: u8) -> RiskLevel {
        if risk_score < self.policy.summary_medium_from {
            RiskLevel::Low
        } else if risk_score < self.policy.summary_high_from {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn summary(
        &self,
        risk_score: u8,
        risk: &CategoryMap,
        dark_patterns: &CategoryMap,
    ) -> Result<ExecutiveSummary, SummaryError> {
        let mut critical_issues = Vec::new();
        let mut moderate_concerns = Vec::new();

        for (category, result) in risk {
            check_consistent(category, result)?;
            let (impact, action) = RISK_IMPACTS
                .iter()
                .find(|(c, _, _)| *c == category.as_str())
                .map(|(_, impact, action)| (impact.to_string(), action.to_string()))
                .unwrap_or_else(|| {
                    (
                        result.description.clone(),
                        "Review this clause carefully".to_string(),
                    )
                });
            let issue = SummaryIssue {
                kind: category_label(category),
                count: result.count,
                impact,
                action,
            };
            if self.policy.severity_class(category) == Severity::Critical {
                critical_issues.push(issue);
            } else {
                moderate_concerns.push(issue);
            }
        }

        for (category, result) in dark_patterns {
            check_consistent(category, result)?;
            let issue = SummaryIssue {
                kind: category_label(category),
                count: result.count,
                impact: format!("Designed to trick you into {}", category.replace('_', " ")),
                action: "Be extra cautious - this is intentionally deceptive".to_string(),
            };
            if self.policy.severity_class(category) == Severity::Critical {
                critical_issues.push(issue);
            } else {
                moderate_concerns.push(issue);
            }
        }

        let critical = critical_issues.len();
        let moderate = moderate_concerns.len();

        let (overall_assessment, bottom_line) = if critical > 0 {
            (
                format!(
                    "DANGER: {} critical issue{} found that could seriously harm you. This company is asking you to give up fundamental rights.",
                    critical,
                    plural(critical)
                ),
                "DO NOT AGREE unless you fully understand and accept these major risks",
            )
        } else if moderate > 2 {
            (
                format!(
                    "CAUTION: {} concerning clauses found. This company prioritizes their protection over yours.",
                    moderate
                ),
                "PROCEED WITH CAUTION - Consider alternatives with better terms",
            )
        } else if moderate > 0 {
            (
                format!(
                    "MIXED: {} issue{} found, but within normal range for this type of service.",
                    moderate,
                    plural(moderate)
                ),
                "ACCEPTABLE - Standard risks for this service type",
            )
        } else {
            (
                "GOOD: No major red flags detected. This appears to be a user-friendly agreement."
                    .to_string(),
                "SAFE TO PROCEED - This company respects user rights",
            )
        };

        let immediate_actions: &[&str] = if critical > 0 {
            &[
                "STOP - Do not sign this agreement yet",
                "Get legal advice if the service is essential to you",
                "Look for alternative services with better terms",
                "Document what data you'll lose access to",
            ]
        } else if moderate > 2 {
            &[
                "Read every flagged section in detail",
                "Understand exactly what rights you're giving up",
                "Set up data export/backup before agreeing",
                "Check if you can negotiate better terms",
            ]
        } else {
            &[
                "Save a copy of these terms for your records",
                "Review the flagged sections once more",
                "Set calendar reminders to check for term changes",
            ]
        };

        let mut next_steps: Vec<String> = CATEGORY_NEXT_STEPS
            .iter()
            .filter(|(category, _)| risk.contains_key(*category) || dark_patterns.contains_key(*category))
            .map(|(_, step)| step.to_string())
            .collect();
        next_steps.extend(DEFAULT_NEXT_STEPS.iter().map(|s| s.to_string()));

        Ok(ExecutiveSummary {
            overall_assessment,
            critical_issues,
            moderate_concerns,
            immediate_actions: immediate_actions.iter().map(|s| s.to_string()).collect(),
            next_steps,
            risk_level: self.risk_level(risk_score),
            bottom_line: bottom_line.to_string(),
        })
    }
}

fn first_floor(floors: &[Floor], count: usize) -> Option<f64> {
    floors
        .iter()
        .find(|f| count >= f.min_count)
        .map(|f| f.score)
}

fn check_consistent(category: &str, result: &CategoryResult) -> Result<(), SummaryError> {
    if result.count == 0 {
        return Err(SummaryError::EmptyCategory(category.to_string()));
    }
    if result.count != result.matches.len() {
        return Err(SummaryError::CountMismatch {
            category: category.to_string(),
            count: result.count,
            matches: result.matches.len(),
        });
    }
    Ok(())
}

/// "arbitration_waiver" -> "Arbitration Waiver"
pub fn category_label(category: &str) -> String {
    title_case(&category.replace('_', " "))
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
