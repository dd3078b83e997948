//! Structural dark patterns
//!
//! Scans the full text rather than sentences: exit barriers and retention
//! traps often straddle sentence boundaries.

use std::collections::BTreeMap;

use shared_types::power::{StructuralFinding, StructuralScan};
use shared_types::ContextMatch;

use crate::catalog::{DetectionRule, PowerCatalog};

const CONTEXT_RADIUS: usize = 50;

pub fn scan_structural(catalog: &PowerCatalog, text: &str) -> StructuralScan {
    let mut patterns = BTreeMap::new();
    let mut total_weight: u32 = 0;
    let mut matches = 0;

    for structural in &catalog.structural {
        let rule = &structural.rule;
        let clauses = find_with_context(rule, text, CONTEXT_RADIUS);
        if clauses.is_empty() {
            continue;
        }
        let weight = rule.weight.unsigned_abs() * clauses.len() as u32;
        total_weight += weight;
        matches += clauses.len();
        patterns.insert(
            rule.category.to_string(),
            StructuralFinding {
                clause_count: clauses.len(),
                manipulation_type: structural.manipulation_type.to_string(),
                damage_level: rule.severity,
                total_weight: weight,
                clauses,
            },
        );
    }

    let friction = total_weight.min(100);
    StructuralScan {
        total_patterns_found: patterns.len(),
        patterns,
        friction_score: friction,
        manipulation_score: total_weight,
        manipulation_severity: manipulation_severity(total_weight).to_string(),
        dark_patterns_detected: matches,
        assessment: structural_assessment(friction).to_string(),
    }
}

fn manipulation_severity(score: u32) -> &'static str {
    match score {
        80.. => "Extreme manipulation detected",
        60..=79 => "High manipulation risk",
        40..=59 => "Moderate manipulation present",
        20..=39 => "Some manipulative elements",
        _ => "Minimal manipulation detected",
    }
}

fn structural_assessment(friction: u32) -> &'static str {
    if friction > 20 {
        "Extreme friction - users are structurally trapped"
    } else if friction > 15 {
        "High friction - difficult for users to exercise rights"
    } else if friction > 8 {
        "Moderate friction in user processes"
    } else {
        "Low friction - reasonable user experience"
    }
}

/// Every hit of every expression with `radius` bytes of surrounding text
pub(crate) fn find_with_context(rule: &DetectionRule, text: &str, radius: usize) -> Vec<ContextMatch> {
    rule.expressions
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| ContextMatch {
            matched_text: m.as_str().to_string(),
            context: context_window(text, m.start(), m.end(), radius),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// `text[start - radius .. end + radius]`, widened to char boundaries and trimmed
pub(crate) fn context_window(text: &str, start: usize, end: usize, radius: usize) -> String {
    let mut from = start.saturating_sub(radius);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + radius).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].trim().to_string()
}
