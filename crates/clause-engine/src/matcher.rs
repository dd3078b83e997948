//! Clause matcher
//!
//! Applies the basic risk, dark-pattern and positive rule sets to every
//! section. Every hit of every expression is an occurrence; two expressions
//! hitting the same sentence count twice.
//!
//! Sentence boundaries and legal phrasing are indexed once per section, so a
//! pass is linear in section length plus `hits * log(sentences)`.

use std::collections::{BTreeMap, BTreeSet};

use shared_types::{
    CategoryMap, CategoryResult, FlagKind, FlaggedSection, Match, Provenance, Section,
    SectionFlag,
};
use tracing::debug;

use crate::catalog::{Catalog, DetectionRule, RuleSet};
use crate::confidence;
use crate::segmenter::truncate_chars;

const EXCERPT_CHARS: usize = 500;

/// Per-category results of one pass over the sections
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub risk: CategoryMap,
    pub dark_patterns: CategoryMap,
    pub positive: CategoryMap,
    pub flagged_sections: Vec<FlaggedSection>,
    pub total_flags: usize,
}

pub struct ClauseMatcher<'c> {
    catalog: &'c Catalog,
}

impl<'c> ClauseMatcher<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    pub fn match_sections(&self, sections: &[Section]) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();

        for section in sections {
            let sentences = SentenceIndex::new(&section.text);
            let mut flags = Vec::new();

            for (category, description, m) in scan_rule_set(&self.catalog.risk, section, &sentences) {
                flags.push(section_flag(FlagKind::Risk, category, description, &m));
                record(&mut outcome.risk, self.catalog.risk.get(category), m);
            }
            for (category, description, m) in
                scan_rule_set(&self.catalog.dark_patterns, section, &sentences)
            {
                flags.push(section_flag(FlagKind::DarkPattern, category, description, &m));
                record(&mut outcome.dark_patterns, self.catalog.dark_patterns.get(category), m);
            }
            for (category, _, m) in scan_rule_set(&self.catalog.positive, section, &sentences) {
                record(&mut outcome.positive, self.catalog.positive.get(category), m);
            }

            if !flags.is_empty() {
                outcome.total_flags += flags.len();
                outcome.flagged_sections.push(FlaggedSection {
                    section: section.ordinal,
                    title: section.title.clone(),
                    excerpt: truncate_chars(section.text.trim(), EXCERPT_CHARS),
                    flag_count: flags.len(),
                    flags,
                });
            }
        }

        debug!(
            risk = outcome.risk.len(),
            dark = outcome.dark_patterns.len(),
            positive = outcome.positive.len(),
            flags = outcome.total_flags,
            "clause matcher finished"
        );
        outcome
    }
}

fn section_flag(kind: FlagKind, category: &str, description: &str, m: &Match) -> SectionFlag {
    SectionFlag {
        kind,
        category: category.to_string(),
        text: m.text.clone(),
        description: description.to_string(),
    }
}

fn record(map: &mut CategoryMap, rule: Option<&DetectionRule>, m: Match) {
    let Some(rule) = rule else { return };
    match map.get_mut(rule.category) {
        Some(existing) => existing.push(m),
        None => {
            map.insert(
                rule.category.to_string(),
                CategoryResult::new(
                    rule.category,
                    rule.severity,
                    rule.weight.unsigned_abs(),
                    rule.description,
                    Provenance::Pattern,
                    m,
                ),
            );
        }
    }
}

fn scan_rule_set(
    rules: &RuleSet,
    section: &Section,
    sentences: &SentenceIndex<'_>,
) -> Vec<(&'static str, &'static str, Match)> {
    rules
        .iter()
        .flat_map(|rule| {
            scan_indexed(rule, section, sentences)
                .into_iter()
                .map(move |m| (rule.category, rule.description, m))
        })
        .collect()
}

/// All occurrences of one rule in a section, in expression order
pub fn scan_rule(rule: &DetectionRule, section: &Section) -> Vec<Match> {
    scan_indexed(rule, section, &SentenceIndex::new(&section.text))
}

fn scan_indexed(rule: &DetectionRule, section: &Section, sentences: &SentenceIndex<'_>) -> Vec<Match> {
    let text = section.text.as_str();
    let hits: Vec<(usize, usize, usize)> = rule
        .expressions
        .iter()
        .enumerate()
        .flat_map(|(idx, re)| re.find_iter(text).map(move |m| (idx, m.start(), m.end())))
        .collect();

    // distinct expressions per start key
    let mut expressions: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for &(idx, start, _) in &hits {
        expressions
            .entry(sentences.start_key(start))
            .or_default()
            .insert(idx);
    }

    hits.iter()
        .map(|&(_, start, end)| {
            let (first, last) = (sentences.slot(start), sentences.slot(end));
            let co_occurring = if first == last {
                expressions.get(&(2 * first)).map_or(0, BTreeSet::len)
            } else {
                expressions
                    .range(2 * first..=2 * last)
                    .flat_map(|(_, set)| set)
                    .collect::<BTreeSet<_>>()
                    .len()
            };

            let matched = &text[start..end];
            Match {
                text: matched.to_string(),
                start: section.start + start,
                end: section.start + end,
                section: Some(section.ordinal),
                confidence: Some(confidence::score_with_phrasing(
                    rule.confidence_base,
                    matched.chars().count(),
                    sentences.has_legal_phrasing(start, end),
                    co_occurring,
                )),
            }
        })
        .collect()
}

fn is_boundary(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

/// Sentence layout of one section.
///
/// Slot `k` is the text between boundary `k - 1` and boundary `k`; the last
/// slot runs to the end of the section.
pub struct SentenceIndex<'t> {
    text: &'t str,
    /// Byte offsets of boundary characters, ascending
    boundaries: Vec<usize>,
    /// Legal phrasing per slot
    legal: Vec<bool>,
}

impl<'t> SentenceIndex<'t> {
    pub fn new(text: &'t str) -> Self {
        let boundaries = text
            .char_indices()
            .filter(|&(_, c)| is_boundary(c))
            .map(|(i, _)| i)
            .collect();
        let mut index = Self {
            text,
            boundaries,
            legal: Vec::new(),
        };
        index.legal = (0..=index.boundaries.len())
            .map(|slot| confidence::has_legal_phrasing(&text[index.slot_start(slot)..index.slot_end(slot)]))
            .collect();
        index
    }

    /// Number of boundaries before `offset`
    fn slot(&self, offset: usize) -> usize {
        self.boundaries.partition_point(|&b| b < offset)
    }

    fn slot_start(&self, slot: usize) -> usize {
        // boundary characters are ASCII
        slot.checked_sub(1)
            .map_or(0, |prev| self.boundaries[prev] + 1)
    }

    fn slot_end(&self, slot: usize) -> usize {
        self.boundaries
            .get(slot)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Starts inside slot `k` map to `2k`, a start on boundary `k` to `2k + 1`
    fn start_key(&self, offset: usize) -> usize {
        let slot = self.slot(offset);
        2 * slot + usize::from(self.boundaries.get(slot) == Some(&offset))
    }

    /// Byte range of the sentence enclosing `[start, end)`
    pub fn bounds(&self, start: usize, end: usize) -> (usize, usize) {
        (self.slot_start(self.slot(start)), self.slot_end(self.slot(end)))
    }

    fn has_legal_phrasing(&self, start: usize, end: usize) -> bool {
        let (first, last) = (self.slot(start), self.slot(end));
        if first == last {
            self.legal[first]
        } else {
            let (from, to) = self.bounds(start, end);
            confidence::has_legal_phrasing(&self.text[from..to])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::segment_sections;

    fn run(text: &str) -> MatchOutcome {
        let catalog = Catalog::builtin().unwrap();
        ClauseMatcher::new(catalog).match_sections(&segment_sections(text))
    }

    #[test]
    fn test_detects_data_sharing_and_arbitration() {
        let outcome = run(
            "We may share your personal information with third parties. \
             You waive your right to a jury trial and agree to binding arbitration.",
        );
        assert!(outcome.risk.contains_key("data_sharing"));
        let arbitration = &outcome.risk["arbitration_waiver"];
        // jury-trial waiver and binding arbitration are separate expressions
        assert_eq!(arbitration.count, 2);
        assert_eq!(arbitration.matches.len(), 2);
        assert_eq!(arbitration.provenance, Provenance::Pattern);
    }

    #[test]
    fn test_offsets_are_absolute() {
        let text = "Intro text.\n1. DISPUTES\nAll claims go to binding arbitration.\n";
        let outcome = run(text);
        let m = &outcome.risk["arbitration_waiver"].matches[0];
        assert_eq!(&text[m.start..m.end], m.text);
        assert_eq!(m.section, Some(2));
    }

    #[test]
    fn test_matches_are_case_insensitive() {
        let outcome = run("THIS AGREEMENT REQUIRES BINDING ARBITRATION OF ALL CLAIMS.");
        assert!(outcome.risk.contains_key("arbitration_waiver"));
    }

    #[test]
    fn test_confidence_within_bounds() {
        let outcome = run(
            "Notwithstanding anything else, you shall resolve disputes through mandatory arbitration.",
        );
        let result = &outcome.risk["arbitration_waiver"];
        for m in &result.matches {
            let c = m.confidence.unwrap();
            assert!(c > 0.85 && c <= confidence::MAX_CONFIDENCE, "{}", c);
        }
        assert!(result.confidence.is_some());
    }

    #[test]
    fn test_flagged_sections_cover_risk_and_dark_patterns() {
        let text = "1. BILLING\nYour subscription will automatically renew. Additional fees may apply.\n\
                    2. RIGHTS\nYou have the right to access your data.\n";
        let outcome = run(text);
        assert_eq!(outcome.flagged_sections.len(), 1);
        let flagged = &outcome.flagged_sections[0];
        assert_eq!(flagged.section, 1);
        assert_eq!(flagged.title, "Billing");
        assert!(flagged.flags.iter().all(|f| f.kind == FlagKind::DarkPattern));
        assert_eq!(flagged.flag_count, flagged.flags.len());
        assert_eq!(outcome.total_flags, flagged.flag_count);
        // positives never raise flags
        assert!(outcome.positive.contains_key("user_rights"));
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let body = "binding arbitration ".repeat(40);
        let outcome = run(&body);
        let excerpt = &outcome.flagged_sections[0].excerpt;
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_empty_sections_give_empty_outcome() {
        let outcome = run("");
        assert!(outcome.risk.is_empty());
        assert!(outcome.flagged_sections.is_empty());
        assert_eq!(outcome.total_flags, 0);
    }

    #[test]
    fn test_sentence_bounds() {
        let text = "First one. Second has binding arbitration here. Third.";
        let index = SentenceIndex::new(text);
        let start = text.find("binding").unwrap();
        let (s, e) = index.bounds(start, start + 7);
        assert_eq!(&text[s..e], " Second has binding arbitration here");

        let (s, e) = index.bounds(0, 5);
        assert_eq!(&text[s..e], "First one");
        let third = text.find("Third").unwrap();
        let (s, e) = index.bounds(third, third + 5);
        assert_eq!(&text[s..e], " Third");
    }

    #[test]
    fn test_sentence_bounds_without_boundaries() {
        let text = "binding arbitration and mandatory arbitration";
        let index = SentenceIndex::new(text);
        assert_eq!(index.bounds(10, 20), (0, text.len()));
    }

    fn body(text: &str) -> Section {
        Section {
            title: "Untitled".to_string(),
            ordinal: 1,
            text: text.to_string(),
            start: 0,
            end: text.len(),
            line_start: 1,
            line_end: 1,
        }
    }

    #[test]
    fn test_co_occurrence_is_per_sentence() {
        let section = body(
            "We study behavioral data and track your browsing habits. \
             Behavioral data is kept for a year.",
        );
        let catalog = Catalog::builtin().unwrap();
        let rule = catalog.dark_patterns.get("data_harvesting").unwrap();
        let matches = scan_rule(rule, &section);
        assert_eq!(matches.len(), 3);

        let behavioral: Vec<f64> = matches
            .iter()
            .filter(|m| m.text.eq_ignore_ascii_case("behavioral data"))
            .map(|m| m.confidence.unwrap())
            .collect();
        // two expressions share the first sentence, one stands alone in the second
        assert_eq!(behavioral.len(), 2);
        assert!((behavioral[0] - 0.9).abs() < 1e-9, "{:?}", behavioral);
        assert!((behavioral[1] - 0.85).abs() < 1e-9, "{:?}", behavioral);
    }

    #[test]
    fn test_legal_phrasing_is_per_sentence() {
        let text = "Notwithstanding the above, you waive any jury trial. \
                    Separately, binding arbitration applies.";
        let index = SentenceIndex::new(text);
        let jury = text.find("jury").unwrap();
        let binding = text.find("binding").unwrap();
        assert!(index.has_legal_phrasing(jury, jury + 4));
        assert!(!index.has_legal_phrasing(binding, binding + 7));
    }

    #[test]
    fn test_many_hits_in_one_sentence() {
        let text = "All claims go to binding arbitration and mandatory arbitration ".repeat(2000);
        let outcome = run(&text);
        let arbitration = &outcome.risk["arbitration_waiver"];
        assert_eq!(arbitration.count, 4000);
        // one sentence, two expressions: every hit gets the same boost
        let first = arbitration.matches[0].confidence;
        assert!(arbitration.matches.iter().all(|m| m.confidence == first));
        assert!((arbitration.confidence.unwrap() - first.unwrap()).abs() < 1e-9);
    }
}
