//! Data model shared by the clause engine and the HTTP service

pub mod power;
pub mod report;
pub mod types;

pub use power::{
    CommodificationKind, ContextMatch, Flag, FlagCategory, PowerAnalysis, PowerClause,
    PowerFlowMap, TransparencyLevel,
};
pub use report::{
    AnalysisReport, CategoryMap, ClassificationInfo, ClassificationMethod, ExecutiveSummary,
    FlagKind, FlaggedSection, ReadabilityMetrics, SectionFlag, SummaryIssue,
};
pub use types::{
    CategoryResult, Match, Persona, PowerHolder, Provenance, RiskLevel, Section, Severity,
    UnknownPersona,
};
