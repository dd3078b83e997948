//! Text segmentation
//!
//! Splits a document into sentences (for sentence-level scanners) and into
//! heading-keyed sections (for the clause matcher). Both keep byte offsets
//! into the original text so matches can be located in the source.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::Section;

/// Fragments this short are noise rather than clauses
pub const MIN_SENTENCE_CHARS: usize = 10;

const MAX_TITLE_CHARS: usize = 60;

lazy_static! {
    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]+").unwrap();

    /// "1. Scope", "2.1 Definitions", "IV. Liability"
    static ref NUMBERED_HEADING: Regex =
        Regex::new(r"^(?:\d+(?:\.\d+)*\.?|[IVXLC]+\.)\s+(\S.*)$").unwrap();

    /// "Section 4 - Termination", "ARTICLE IX"
    static ref ARTICLE_HEADING: Regex =
        Regex::new(r"(?i)^(?:section|article|part|clause)\s+(?:\d+(?:\.\d+)*|[ivxlc]+)\b[.:)]?\s*[-:]?\s*(.*)$").unwrap();

    /// "(a) Fees", "(iv) Refunds", "B. Payment", "c) Notices"
    static ref LETTERED_HEADING: Regex =
        Regex::new(r"^(?:\([a-zA-Z]\)|\((?:i|ii|iii|iv|v|vi|vii|viii|ix|x)\)|[A-Z]\.|[a-z]\))\s+(\S.*)$").unwrap();

    /// Short lines led by a common legal section keyword
    static ref KEYWORD_HEADING: Regex = Regex::new(
        r"(?i)^(?:privacy|data|terms|conditions|liability|arbitration|termination|governing law|disputes?|payment|fees|cancellation|refunds?|warrant|indemnif|changes to|contact us|definitions)"
    ).unwrap();
}

/// A sentence with its byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Every non-empty fragment between terminal punctuation, trimmed
pub(crate) fn fragments(text: &str) -> Vec<Sentence<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        push_fragment(text, last, m.start(), &mut out);
        last = m.end();
    }
    push_fragment(text, last, text.len(), &mut out);
    out
}

fn push_fragment<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Sentence<'a>>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let offset = start + (raw.len() - raw.trim_start().len());
    out.push(Sentence {
        text: trimmed,
        start: offset,
        end: offset + trimmed.len(),
    });
}

/// Split on runs of `.`, `!` or `?`, dropping fragments of 10 characters or fewer
pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    fragments(text)
        .into_iter()
        .filter(|s| s.text.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// Title for a heading line, or `None` for body text
pub fn detect_heading(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(caps) = NUMBERED_HEADING.captures(line) {
        return Some(normalize_title(&caps[1]));
    }
    if let Some(caps) = ARTICLE_HEADING.captures(line) {
        let rest = caps[1].trim();
        return Some(if rest.is_empty() {
            normalize_title(line)
        } else {
            normalize_title(rest)
        });
    }
    if let Some(caps) = LETTERED_HEADING.captures(line) {
        return Some(normalize_title(&caps[1]));
    }
    if is_all_caps(line) {
        return Some(normalize_title(line));
    }
    if line.chars().count() <= MAX_TITLE_CHARS
        && !line.ends_with('.')
        && KEYWORD_HEADING.is_match(line)
    {
        return Some(normalize_title(line));
    }
    None
}

fn is_all_caps(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 3
        && line.chars().count() <= 100
        && !line.chars().any(|c| c.is_lowercase())
}

fn normalize_title(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(':').trim();
    let title = if is_all_caps(trimmed) {
        title_case(trimmed)
    } else {
        trimmed.to_string()
    };
    truncate_chars(&title, MAX_TITLE_CHARS)
}

/// "DATA COLLECTION" -> "Data Collection"
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Cut to at most `max` characters, marking the cut with "..."
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

struct OpenSection {
    start: usize,
    line_start: usize,
    title: Option<String>,
    has_content: bool,
}

impl OpenSection {
    fn new(start: usize, line_start: usize, title: Option<String>) -> Self {
        Self {
            start,
            line_start,
            title,
            has_content: false,
        }
    }
}

/// Split into heading-keyed sections.
///
/// The sections tile the input: concatenating their texts gives back the
/// original string byte for byte. Empty input yields no sections.
pub fn segment_sections(text: &str) -> Vec<Section> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut closed: Vec<(OpenSection, usize, usize)> = Vec::new();
    let mut current = OpenSection::new(0, 1, None);
    let mut offset = 0;
    let mut line_no = 0;

    for line in text.split_inclusive('\n') {
        line_no += 1;
        if let Some(title) = detect_heading(line) {
            if current.has_content {
                let next = OpenSection::new(offset, line_no, Some(title));
                closed.push((std::mem::replace(&mut current, next), offset, line_no - 1));
            } else if current.title.is_none() {
                current.title = Some(title);
            }
        }
        if !line.trim().is_empty() {
            current.has_content = true;
        }
        offset += line.len();
    }
    closed.push((current, text.len(), line_no));

    let single = closed.len() == 1;
    closed
        .into_iter()
        .enumerate()
        .map(|(idx, (open, end, line_end))| {
            let title = open.title.unwrap_or_else(|| {
                if single { "Untitled" } else { "Introduction" }.to_string()
            });
            Section {
                title,
                ordinal: idx + 1,
                text: text[open.start..end].to_string(),
                start: open.start,
                end,
                line_start: open.line_start,
                line_end,
            }
        })
        .collect()
}

/// Ordinal of the section containing byte `offset`
pub fn section_at(sections: &[Section], offset: usize) -> Option<usize> {
    let idx = sections.partition_point(|s| s.start <= offset);
    if idx == 0 {
        return None;
    }
    let section = &sections[idx - 1];
    (offset < section.end).then_some(section.ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbered_heading_title() {
        let text = "1. DATA COLLECTION\nWe collect your email address and usage data.\n";
        let sections = segment_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Data Collection");
        assert_eq!(sections[0].ordinal, 1);
    }

    #[test]
    fn test_preamble_is_introduction() {
        let text = "Welcome to the service.\n\n1. DATA COLLECTION\nWe collect data.\n2. ARBITRATION\nDisputes go to arbitration.\n";
        let sections = segment_sections(text);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Introduction", "Data Collection", "Arbitration"]);
        assert_eq!(
            sections.iter().map(|s| s.ordinal).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_no_headings_is_single_untitled_section() {
        let text = "we may share your information with third parties.\nthat is all.";
        let sections = segment_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Untitled");
        assert_eq!(sections[0].text, text);
        assert_eq!(sections[0].line_start, 1);
        assert_eq!(sections[0].line_end, 2);
    }

    #[test]
    fn test_empty_input_has_no_sections() {
        assert!(segment_sections("").is_empty());
    }

    #[test]
    fn test_sections_tile_the_input() {
        let text = "PRIVACY POLICY\n\nIntro text here.\n(a) Cookies\nWe use cookies.\nSection 3: Termination\nWe may end it.";
        let sections = segment_sections(text);
        let rebuilt: String = sections.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, text);
        for pair in sections.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].line_end + 1, pair[1].line_start);
        }
        assert_eq!(sections.last().unwrap().end, text.len());
    }

    #[test]
    fn test_heading_after_blank_lines_titles_first_section() {
        let text = "\n\nTERMS OF SERVICE\nBody.\n";
        let sections = segment_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Terms Of Service");
        assert_eq!(sections[0].start, 0);
    }

    #[test]
    fn test_detect_heading_variants() {
        assert_eq!(detect_heading("2.1 Scope of Service").as_deref(), Some("Scope of Service"));
        assert_eq!(detect_heading("(b) Refunds").as_deref(), Some("Refunds"));
        assert_eq!(detect_heading("ARTICLE IX").as_deref(), Some("Article Ix"));
        assert_eq!(detect_heading("Governing Law").as_deref(), Some("Governing Law"));
        assert_eq!(detect_heading("LIMITATION OF LIABILITY:").as_deref(), Some("Limitation Of Liability"));
        assert_eq!(detect_heading("We collect your data for analytics."), None);
        assert_eq!(detect_heading("Data is shared with partners."), None);
        assert_eq!(detect_heading("   "), None);
    }

    #[test]
    fn test_long_numbered_clause_title_is_truncated() {
        let title = detect_heading(
            "1. We reserve the right to modify these terms at any time without prior notice to you or anyone",
        )
        .unwrap();
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS + 3);
    }

    #[test]
    fn test_split_sentences_offsets() {
        let text = "Short. We may share your information with partners! Is that fine?";
        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "We may share your information with partners");
        assert_eq!(&text[sentences[0].start..sentences[0].end], sentences[0].text);
        assert_eq!(sentences[1].text, "Is that fine");
    }

    #[test]
    fn test_ten_char_fragment_is_dropped() {
        // exactly ten characters
        assert!(split_sentences("Abcdefghij.").is_empty());
        assert_eq!(split_sentences("Abcdefghijk.").len(), 1);
    }

    #[test]
    fn test_section_at() {
        let text = "Intro line.\n1. FEES\nFees apply.\n";
        let sections = segment_sections(text);
        assert_eq!(section_at(&sections, 0), Some(1));
        assert_eq!(section_at(&sections, text.find("Fees apply").unwrap()), Some(2));
        assert_eq!(section_at(&sections, text.len()), None);
    }

    #[test]
    fn test_title_case_handles_unicode() {
        assert_eq!(title_case("ÉTAT DES LIEUX"), "État Des Lieux");
    }
}
