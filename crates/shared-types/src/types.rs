use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity class of a detected clause.
///
/// Ordered from least to most severe so `max()` and range checks read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse verdict bucket attached to scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// The kind of reader an analysis is weighted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    IndividualUser,
    #[serde(alias = "business_user")]
    SmallBusiness,
    Developer,
    #[serde(alias = "healthcare")]
    HealthcareProvider,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::IndividualUser,
        Persona::SmallBusiness,
        Persona::Developer,
        Persona::HealthcareProvider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::IndividualUser => "individual_user",
            Persona::SmallBusiness => "small_business",
            Persona::Developer => "developer",
            Persona::HealthcareProvider => "healthcare_provider",
        }
    }

    /// Human-readable form, e.g. "small business"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown persona: {0}")]
pub struct UnknownPersona(pub String);

impl FromStr for Persona {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual_user" | "individual" => Ok(Persona::IndividualUser),
            "small_business" | "business_user" | "business" => Ok(Persona::SmallBusiness),
            "developer" => Ok(Persona::Developer),
            "healthcare_provider" | "healthcare" => Ok(Persona::HealthcareProvider),
            other => Err(UnknownPersona(other.to_string())),
        }
    }
}

/// Which party a clause hands control to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerHolder {
    Company,
    User,
    Shared,
    Unclear,
}

/// A structural chunk of a document, keyed by the heading that opened it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// 1-based, contiguous across the document
    pub ordinal: usize,
    pub text: String,
    /// Byte offset of the first byte of the section in the source text
    pub start: usize,
    /// Byte offset one past the last byte
    pub end: usize,
    pub line_start: usize,
    pub line_end: usize,
}

/// One occurrence of a category in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Ordinal of the section the occurrence fell in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Which detection path produced a category result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Pattern,
    Classifier,
    Merged,
}

/// Everything found for one category. Only built once a first match exists,
/// so `count` is never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: String,
    pub count: usize,
    pub matches: Vec<Match>,
    pub severity: Severity,
    pub weight: u32,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub provenance: Provenance,
    /// Sum and count of the scored matches behind `confidence`
    #[serde(skip)]
    confidence_sum: f64,
    #[serde(skip)]
    scored: usize,
}

impl CategoryResult {
    pub fn new(
        category: impl Into<String>,
        severity: Severity,
        weight: u32,
        description: impl Into<String>,
        provenance: Provenance,
        first: Match,
    ) -> Self {
        let mut result = Self {
            category: category.into(),
            count: 0,
            matches: Vec::new(),
            severity,
            weight,
            description: description.into(),
            confidence: None,
            provenance,
            confidence_sum: 0.0,
            scored: 0,
        };
        result.push(first);
        result
    }

    /// Record another occurrence and refresh the mean confidence
    pub fn push(&mut self, m: Match) {
        if let Some(c) = m.confidence {
            self.confidence_sum += c;
            self.scored += 1;
            self.confidence = Some(self.confidence_sum / self.scored as f64);
        }
        self.count += 1;
        self.matches.push(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(confidence: Option<f64>) -> Match {
        Match {
            text: "binding arbitration".to_string(),
            start: 0,
            end: 19,
            section: Some(1),
            confidence,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_persona_aliases() {
        assert_eq!("business_user".parse::<Persona>().unwrap(), Persona::SmallBusiness);
        assert_eq!("healthcare".parse::<Persona>().unwrap(), Persona::HealthcareProvider);
        assert_eq!(" Developer ".parse::<Persona>().unwrap(), Persona::Developer);
        assert!("astronaut".parse::<Persona>().is_err());
    }

    #[test]
    fn test_persona_serde_alias() {
        let p: Persona = serde_json::from_str("\"business_user\"").unwrap();
        assert_eq!(p, Persona::SmallBusiness);
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"small_business\"");
    }

    #[test]
    fn test_category_result_never_empty() {
        let result = CategoryResult::new(
            "arbitration_waiver",
            Severity::Critical,
            25,
            "Arbitration",
            Provenance::Pattern,
            m(Some(0.9)),
        );
        assert_eq!(result.count, 1);
        assert_eq!(result.matches.len(), 1);
    }

    #[test]
    fn test_category_confidence_is_mean_of_scored_matches() {
        let mut result = CategoryResult::new(
            "arbitration_waiver",
            Severity::Critical,
            25,
            "Arbitration",
            Provenance::Pattern,
            m(Some(0.8)),
        );
        result.push(m(None));
        result.push(m(Some(0.6)));
        assert_eq!(result.count, 3);
        let confidence = result.confidence.unwrap();
        assert!((confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_running_mean_over_many_matches() {
        let mut result = CategoryResult::new(
            "data_sharing",
            Severity::Critical,
            25,
            "Data sharing",
            Provenance::Pattern,
            m(None),
        );
        assert_eq!(result.confidence, None);
        for i in 0..10_000 {
            result.push(m(Some(if i % 2 == 0 { 0.6 } else { 0.8 })));
        }
        assert_eq!(result.count, 10_001);
        assert!((result.confidence.unwrap() - 0.7).abs() < 1e-9);
    }
}
