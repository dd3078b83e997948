//! Power-structure sub-report
//!
//! Produced independently of the clause-weighted risk score and reported
//! alongside it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Persona, PowerHolder, RiskLevel, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerAnalysis {
    pub user_persona: Persona,
    pub sentences_analyzed: usize,
    pub power_imbalance: PowerImbalance,
    pub structural_dark_patterns: StructuralScan,
    pub data_commodification: CommodificationScan,
    pub weighted_risk: WeightedRisk,
    pub flags: FlagReport,
    pub rights_stripping: RightsStrippingIndex,
    pub transparency_empowerment: EmpowermentAssessment,
    pub power_flow: PowerFlowMap,
}

/// A clause that assigns control to one party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerClause {
    pub text: String,
    pub power_holder: PowerHolder,
    pub reversible: bool,
    pub negotiable: bool,
    pub user_can_exit: bool,
    pub impact_level: Severity,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlBreakdown {
    pub clause_count: usize,
    pub power_score: i32,
    pub primary_holder: PowerHolder,
    pub impact: Severity,
    pub clauses: Vec<PowerClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerImbalance {
    pub company_power_percentage: f64,
    pub user_power_percentage: f64,
    pub power_imbalance_score: f64,
    pub digital_dictatorship: bool,
    pub control_mechanisms_detected: usize,
    pub breakdown: BTreeMap<String, ControlBreakdown>,
    pub company_power_points: u32,
    pub user_power_points: u32,
    pub assessment: String,
}

/// Matched text plus the surrounding window it was found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMatch {
    pub matched_text: String,
    pub context: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralFinding {
    pub clause_count: usize,
    pub manipulation_type: String,
    pub damage_level: Severity,
    pub total_weight: u32,
    pub clauses: Vec<ContextMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralScan {
    pub patterns: BTreeMap<String, StructuralFinding>,
    pub total_patterns_found: usize,
    /// Total manipulation weight capped at 100
    pub friction_score: u32,
    pub manipulation_score: u32,
    pub manipulation_severity: String,
    pub dark_patterns_detected: usize,
    pub assessment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommodificationKind {
    AiTraining,
    BehavioralProfiling,
    DataResale,
    PerpetualRights,
}

/// How well a commodification clause is disclosed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransparencyLevel {
    Hidden,
    Vague,
    Buried,
    LegalJargon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodificationFinding {
    pub clause_count: usize,
    pub kind: CommodificationKind,
    pub transparency_level: TransparencyLevel,
    pub opt_out_available: bool,
    pub total_weight: u32,
    pub risk_explanation: String,
    pub clauses: Vec<ContextMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodificationScan {
    pub patterns: BTreeMap<String, CommodificationFinding>,
    pub total_types: usize,
    pub risk_score: u32,
    pub data_safety_score: u32,
    pub hidden_monetization_count: usize,
    pub ai_training_detected: bool,
    pub behavioral_profiling_detected: bool,
    pub data_resale_detected: bool,
    pub perpetual_licensing_detected: bool,
    pub assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRisk {
    pub overall_score: f64,
    pub risk_level: RiskLevel,
    pub assessment: String,
    pub power_risk: f64,
    pub structural_risk: f64,
    pub commodification_risk: f64,
    pub persona_modifier: f64,
    pub high_damage_clauses: Vec<String>,
    pub critical_issues: Vec<String>,
    pub escalation_triggered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCategory {
    PowerImbalance,
    StructuralManipulation,
    DataCommodification,
}

/// One quoted, explained and rated red flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub flag_id: String,
    pub category: FlagCategory,
    pub severity: Severity,
    pub quoted_text: String,
    pub explanation: String,
    /// 1-10, derived from severity
    pub risk_rating: u8,
    pub user_impact: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagReport {
    pub total_flags: usize,
    pub flags: Vec<Flag>,
    /// Flag ids per severity bucket
    pub by_severity: BTreeMap<Severity, Vec<String>>,
    pub critical_flag_count: usize,
    pub high_flag_count: usize,
    pub medium_flag_count: usize,
    pub low_flag_count: usize,
    pub summary: String,
    pub recommended_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RightsViolation {
    pub count: usize,
    pub severity: u32,
    pub description: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundTrap {
    pub name: String,
    pub detected_categories: Vec<String>,
    pub completion_percentage: f64,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RightsStrippingIndex {
    pub violations: BTreeMap<String, RightsViolation>,
    pub total_severity_score: f64,
    /// 1 (rights stripped) to 10 (rights intact)
    pub rights_vs_control_balance: f64,
    pub categories_detected: Vec<String>,
    pub red_flag_triggered: bool,
    pub persona_risk_assessment: String,
    pub compound_traps: Vec<CompoundTrap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpowermentAssessment {
    pub score: u32,
    pub factors: BTreeMap<String, bool>,
    pub real_transparency: bool,
    pub assessment: String,
}

/// Who controls each of the four key decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerFlowMap {
    pub rule_changes: PowerHolder,
    pub service_termination: PowerHolder,
    pub data_ownership: PowerHolder,
    pub dispute_resolution: PowerHolder,
}

impl Default for PowerFlowMap {
    fn default() -> Self {
        Self {
            rule_changes: PowerHolder::Unclear,
            service_termination: PowerHolder::Unclear,
            data_ownership: PowerHolder::Unclear,
            dispute_resolution: PowerHolder::Unclear,
        }
    }
}
