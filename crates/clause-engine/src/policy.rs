//! Scoring policy
//!
//! The severity table, escalation floors and transparency weights used by the
//! risk aggregator. Defaults are the calibrated constants; deployments may
//! override any subset from a config file (missing fields keep defaults).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::Severity;

/// Category severity classes. Unlisted categories are medium.
const SEVERITY_CLASSES: &[(&str, Severity)] = &[
    ("data_sharing", Severity::Critical),
    ("arbitration_waiver", Severity::Critical),
    ("unilateral_changes", Severity::High),
    ("account_suspension", Severity::High),
    ("broad_liability_waiver", Severity::Medium),
    ("consent_by_default", Severity::Medium),
    ("auto_renewal", Severity::Critical),
    ("hidden_costs", Severity::Critical),
    ("data_harvesting", Severity::High),
    ("urgency_pressure", Severity::Medium),
    ("opt_out_difficulty", Severity::Medium),
    ("confusing_language", Severity::Low),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            critical: 25.0,
            high: 15.0,
            medium: 10.0,
            low: 5.0,
        }
    }
}

/// Once `min_count` occurrences are seen, the score is at least `score`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub min_count: usize,
    pub score: f64,
}

impl Floor {
    const fn new(min_count: usize, score: f64) -> Self {
        Self { min_count, score }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinationFloors {
    pub data_sharing_category: String,
    pub arbitration_category: String,
    pub both: f64,
    pub arbitration_only: f64,
    pub data_sharing_only: f64,
}

impl Default for CombinationFloors {
    fn default() -> Self {
        Self {
            data_sharing_category: "data_sharing".to_string(),
            arbitration_category: "arbitration_waiver".to_string(),
            both: 90.0,
            arbitration_only: 75.0,
            data_sharing_only: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyWeights {
    /// Subtracted per distinct dark-pattern category
    pub dark_pattern_penalty: f64,
    /// Fraction of the risk score subtracted
    pub risk_factor: f64,
    /// Added per distinct positive category
    pub positive_bonus: f64,
    pub positive_bonus_cap: f64,
}

impl Default for TransparencyWeights {
    fn default() -> Self {
        Self {
            dark_pattern_penalty: 8.0,
            risk_factor: 0.25,
            positive_bonus: 5.0,
            positive_bonus_cap: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub severity_classes: BTreeMap<String, Severity>,
    pub severity_weights: SeverityWeights,
    /// Extra fraction of the base weight per occurrence beyond the first
    pub additional_occurrence_factor: f64,
    /// Checked in order; first satisfied floor applies
    pub critical_floors: Vec<Floor>,
    /// Only consulted when no critical floor applied
    pub high_floors: Vec<Floor>,
    pub combinations: CombinationFloors,
    pub safety_net_base: f64,
    pub safety_net_step: f64,
    pub transparency: TransparencyWeights,
    /// Summary risk level is low below this score
    pub summary_medium_from: u8,
    /// Summary risk level is high from this score
    pub summary_high_from: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            severity_classes: SEVERITY_CLASSES
                .iter()
                .map(|(category, severity)| (category.to_string(), *severity))
                .collect(),
            severity_weights: SeverityWeights::default(),
            additional_occurrence_factor: 0.5,
            critical_floors: vec![Floor::new(3, 85.0), Floor::new(2, 75.0), Floor::new(1, 65.0)],
            high_floors: vec![Floor::new(4, 60.0), Floor::new(2, 45.0)],
            combinations: CombinationFloors::default(),
            safety_net_base: 60.0,
            safety_net_step: 10.0,
            transparency: TransparencyWeights::default(),
            summary_medium_from: 30,
            summary_high_from: 70,
        }
    }
}

impl ScoringPolicy {
    /// Severity class of a category, medium when unmapped
    pub fn severity_class(&self, category: &str) -> Severity {
        self.severity_classes
            .get(category)
            .copied()
            .unwrap_or(Severity::Medium)
    }

    pub fn base_weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.severity_weights.critical,
            Severity::High => self.severity_weights.high,
            Severity::Medium => self.severity_weights.medium,
            Severity::Low => self.severity_weights.low,
        }
    }

    /// Parse a policy from JSON, keeping defaults for absent fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unmapped_category_defaults_to_medium() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.severity_class("something_new"), Severity::Medium);
        assert_eq!(policy.severity_class("data_sharing"), Severity::Critical);
    }

    #[test]
    fn test_base_weights() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.base_weight(Severity::Critical), 25.0);
        assert_eq!(policy.base_weight(Severity::High), 15.0);
        assert_eq!(policy.base_weight(Severity::Medium), 10.0);
        assert_eq!(policy.base_weight(Severity::Low), 5.0);
    }

    #[test]
    fn test_partial_toml_override_keeps_defaults() {
        let policy: ScoringPolicy = toml::from_str(
            r#"
            safety_net_base = 55.0

            [combinations]
            both = 95.0
            "#,
        )
        .unwrap();
        assert_eq!(policy.safety_net_base, 55.0);
        assert_eq!(policy.combinations.both, 95.0);
        assert_eq!(policy.combinations.arbitration_only, 75.0);
        assert_eq!(policy.critical_floors, ScoringPolicy::default().critical_floors);
    }

    #[test]
    fn test_json_override() {
        let policy = ScoringPolicy::from_json(r#"{"severity_classes": {"data_sharing": "high"}}"#)
            .unwrap();
        assert_eq!(policy.severity_class("data_sharing"), Severity::High);
        // A replaced table drops the other defaults
        assert_eq!(policy.severity_class("arbitration_waiver"), Severity::Medium);
    }
}
