//! Pattern catalog
//!
//! Static rule tables compiled once per process. Two taxonomies live here:
//! - Basic risk / dark-pattern / positive sets scanned by the clause matcher,
//!   plus their sentence-level counterparts used by the pattern classifier
//! - The power-structure sets scanned by the power analyzer
//!
//! Compilation is the one step that can fail for the whole engine: without a
//! catalog there is nothing meaningful to report.

pub mod basic;
pub mod enhanced;
pub mod power;

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::Severity;
use thiserror::Error;

pub use power::{FlowDecision, PowerCatalog};

#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("invalid expression in {set}/{category}: {source}")]
    InvalidExpression {
        set: &'static str,
        category: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("rule {set}/{category} has no expressions")]
    EmptyRule {
        set: &'static str,
        category: &'static str,
    },

    #[error("category {category} declared twice in {set}")]
    DuplicateCategory {
        set: &'static str,
        category: &'static str,
    },
}

/// Uncompiled rule as written in the tables
pub struct RuleSpec {
    pub category: &'static str,
    pub patterns: &'static [&'static str],
    pub weight: i32,
    pub severity: Severity,
    /// Starting point for match confidence before boosts
    pub confidence_base: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSetKind {
    Risk,
    DarkPattern,
    Positive,
    EnhancedRisk,
    EnhancedDarkPattern,
    EnhancedPositive,
    PowerControl,
    Structural,
    Commodification,
    RightsErosion,
    Empowerment,
    PowerFlow,
}

impl RuleSetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSetKind::Risk => "risk",
            RuleSetKind::DarkPattern => "dark_pattern",
            RuleSetKind::Positive => "positive",
            RuleSetKind::EnhancedRisk => "enhanced_risk",
            RuleSetKind::EnhancedDarkPattern => "enhanced_dark_pattern",
            RuleSetKind::EnhancedPositive => "enhanced_positive",
            RuleSetKind::PowerControl => "power_control",
            RuleSetKind::Structural => "structural",
            RuleSetKind::Commodification => "commodification",
            RuleSetKind::RightsErosion => "rights_erosion",
            RuleSetKind::Empowerment => "empowerment",
            RuleSetKind::PowerFlow => "power_flow",
        }
    }
}

/// A compiled, immutable detection rule
pub struct DetectionRule {
    pub category: &'static str,
    pub expressions: Vec<Regex>,
    pub weight: i32,
    pub severity: Severity,
    pub confidence_base: f64,
    pub description: &'static str,
}

impl DetectionRule {
    pub fn compile(set: RuleSetKind, spec: &RuleSpec) -> Result<Self, CatalogError> {
        if spec.patterns.is_empty() {
            return Err(CatalogError::EmptyRule {
                set: set.as_str(),
                category: spec.category,
            });
        }
        Ok(Self {
            category: spec.category,
            expressions: compile_expressions(set, spec.category, spec.patterns)?,
            weight: spec.weight,
            severity: spec.severity,
            confidence_base: spec.confidence_base,
            description: spec.description,
        })
    }

    /// True when any expression hits somewhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.expressions.iter().any(|re| re.is_match(text))
    }

    /// Number of distinct expressions that hit `text`
    pub fn expression_hits(&self, text: &str) -> usize {
        self.expressions.iter().filter(|re| re.is_match(text)).count()
    }
}

pub(crate) fn compile_expressions(
    set: RuleSetKind,
    category: &'static str,
    patterns: &[&'static str],
) -> Result<Vec<Regex>, CatalogError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| CatalogError::InvalidExpression {
                set: set.as_str(),
                category,
                source,
            })
        })
        .collect()
}

/// Ordered mapping category id -> rule
pub struct RuleSet {
    pub kind: RuleSetKind,
    rules: Vec<DetectionRule>,
}

impl RuleSet {
    pub fn compile(kind: RuleSetKind, specs: &[RuleSpec]) -> Result<Self, CatalogError> {
        let mut rules: Vec<DetectionRule> = Vec::with_capacity(specs.len());
        for spec in specs {
            if rules.iter().any(|r| r.category == spec.category) {
                return Err(CatalogError::DuplicateCategory {
                    set: kind.as_str(),
                    category: spec.category,
                });
            }
            rules.push(DetectionRule::compile(kind, spec)?);
        }
        Ok(Self { kind, rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetectionRule> {
        self.rules.iter()
    }

    pub fn get(&self, category: &str) -> Option<&DetectionRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn categories(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.category).collect()
    }
}

/// Every rule set the engine scans with
pub struct Catalog {
    pub risk: RuleSet,
    pub dark_patterns: RuleSet,
    pub positive: RuleSet,
    pub enhanced_risk: RuleSet,
    pub enhanced_dark_patterns: RuleSet,
    pub enhanced_positive: RuleSet,
    pub power: PowerCatalog,
}

lazy_static! {
    static ref BUILTIN: Result<Catalog, CatalogError> = Catalog::compile();
}

impl Catalog {
    /// The process-wide compiled catalog
    pub fn builtin() -> Result<&'static Catalog, CatalogError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    pub fn compile() -> Result<Self, CatalogError> {
        Ok(Self {
            risk: RuleSet::compile(RuleSetKind::Risk, basic::RISK_RULES)?,
            dark_patterns: RuleSet::compile(RuleSetKind::DarkPattern, basic::DARK_PATTERN_RULES)?,
            positive: RuleSet::compile(RuleSetKind::Positive, basic::POSITIVE_RULES)?,
            enhanced_risk: RuleSet::compile(
                RuleSetKind::EnhancedRisk,
                enhanced::ENHANCED_RISK_RULES,
            )?,
            enhanced_dark_patterns: RuleSet::compile(
                RuleSetKind::EnhancedDarkPattern,
                enhanced::ENHANCED_DARK_PATTERN_RULES,
            )?,
            enhanced_positive: RuleSet::compile(
                RuleSetKind::EnhancedPositive,
                enhanced::ENHANCED_POSITIVE_RULES,
            )?,
            power: PowerCatalog::compile()?,
        })
    }
}
