//! Embedding centroid classifier
//!
//! Each category is represented by the mean embedding of a handful of
//! canonical sentences. A sentence belongs to a category when its cosine
//! similarity to that centroid exceeds the acceptance threshold.

use shared_types::{ClassificationMethod, Severity};
use thiserror::Error;
use tracing::{debug, warn};

use super::{Classification, Classifications, ClauseClassifier, IndicatorKind};

/// Similarity must be strictly above this to count
pub const ACCEPTANCE_THRESHOLD: f32 = 0.7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no template embeddings for category {0}")]
    NoTemplates(&'static str),
}

/// Turns text into a fixed-size vector
pub trait Embedder: Send + Sync {
    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// One axis of the concept space: cue stems and how strongly each counts
struct Concept {
    name: &'static str,
    cues: &'static [(&'static str, f32)],
}

/// Axes of the concept space, one per clause family
const CONCEPTS: &[Concept] = &[
    Concept {
        name: "sharing",
        cues: &[
            ("shar", 1.0),
            ("disclos", 1.0),
            ("sell", 1.0),
            ("sold", 1.0),
            ("third", 1.0),
            ("partner", 1.0),
            ("affiliat", 1.0),
            ("advertis", 1.0),
            ("market", 1.0),
            ("commerc", 1.0),
            ("transfer", 1.0),
        ],
    },
    Concept {
        name: "disputes",
        cues: &[
            ("arbitrat", 1.0),
            ("disput", 1.0),
            ("jury", 1.0),
            ("trial", 1.0),
            ("class", 1.0),
            ("waiv", 1.0),
            ("lawsuit", 1.0),
            ("court", 1.0),
            ("litigat", 1.0),
        ],
    },
    Concept {
        name: "changes",
        cues: &[
            ("modif", 1.0),
            ("chang", 1.0),
            ("amend", 1.0),
            ("updat", 1.0),
            ("revis", 1.0),
            ("unilateral", 1.0),
            ("reserv", 1.0),
        ],
    },
    Concept {
        name: "termination",
        cues: &[
            ("suspen", 1.0),
            ("terminat", 1.0),
            ("closur", 1.0),
            ("revok", 2.0),
            ("revoc", 2.0),
            ("ban", 1.0),
            ("banned", 1.0),
            ("deactivat", 1.0),
        ],
    },
    Concept {
        name: "liability",
        cues: &[
            ("liab", 1.0),
            ("damag", 1.0),
            ("disclaim", 1.0),
            ("warrant", 1.0),
            ("risk", 1.0),
            ("responsib", 1.0),
            ("consequen", 1.0),
            ("indemn", 1.0),
        ],
    },
    Concept {
        name: "rights",
        cues: &[
            ("access", 1.0),
            ("delet", 1.0),
            ("portab", 1.0),
            ("opt", 1.0),
            ("request", 1.0),
            ("eras", 1.0),
            ("rectif", 1.0),
        ],
    },
    Concept {
        name: "openness",
        cues: &[
            ("transparen", 1.0),
            ("communicat", 1.0),
            ("explan", 1.0),
            ("clear", 1.0),
            ("plain", 1.0),
            ("advance", 1.0),
            ("notice", 2.0),
            ("notif", 2.0),
            ("informed", 2.0),
        ],
    },
    Concept {
        name: "protection",
        cues: &[
            ("encrypt", 1.0),
            ("secur", 1.0),
            ("protect", 1.0),
            ("gdpr", 1.0),
            ("design", 1.0),
        ],
    },
];

/// Words this many tokens after "without" are not counted
const NEGATION_WINDOW: usize = 2;

/// Cue stems of four letters or more match as prefixes, shorter ones exactly
fn cue_matches(word: &str, cue: &str) -> bool {
    word == cue || (cue.len() >= 4 && word.starts_with(cue))
}

/// Concept-space embedder over a fixed legal lexicon, L2-normalised.
///
/// Each dimension is one clause family; a sentence's coordinates are the
/// weighted counts of that family's cue words. Cues right after "without"
/// are skipped ("without notice" is not a notice). Sentences with no cues
/// embed to the zero vector and match nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconEmbedder;

impl LexiconEmbedder {
    pub fn concept_names() -> impl Iterator<Item = &'static str> {
        CONCEPTS.iter().map(|c| c.name)
    }
}

impl Embedder for LexiconEmbedder {
    fn dimensions(&self) -> usize {
        CONCEPTS.len()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut v = vec![0f32; CONCEPTS.len()];
        let mut negated = 0;
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .map(str::to_lowercase)
        {
            if word == "without" {
                negated = NEGATION_WINDOW;
                continue;
            }
            if negated > 0 {
                negated -= 1;
                continue;
            }
            for (axis, concept) in CONCEPTS.iter().enumerate() {
                if let Some(&(_, weight)) = concept.cues.iter().find(|(cue, _)| cue_matches(&word, cue)) {
                    v[axis] += weight;
                }
            }
        }
        normalize(&mut v);
        Ok(v)
    }
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity; zero when either vector is all zeros
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

struct TemplateSet {
    category: &'static str,
    kind: IndicatorKind,
    severity: Severity,
    weight: u32,
    description: &'static str,
    templates: &'static [&'static str],
}

const TEMPLATES: &[TemplateSet] = &[
    TemplateSet {
        category: "data_sharing",
        kind: IndicatorKind::Risk,
        severity: Severity::Critical,
        weight: 25,
        description: "Data sharing with third parties",
        templates: &[
            "We may share your personal information with third parties for marketing purposes",
            "Your data may be disclosed to our partners and affiliates",
            "We sell personal information to advertising companies",
            "Information shared with business partners for commercial use",
        ],
    },
    TemplateSet {
        category: "arbitration_waiver",
        kind: IndicatorKind::Risk,
        severity: Severity::Critical,
        weight: 20,
        description: "Arbitration clauses that limit legal rights",
        templates: &[
            "All disputes must be resolved through binding arbitration",
            "You waive your right to a jury trial",
            "Class action waiver and individual arbitration requirement",
            "Mandatory arbitration clause limiting legal rights",
        ],
    },
    TemplateSet {
        category: "unilateral_changes",
        kind: IndicatorKind::Risk,
        severity: Severity::High,
        weight: 15,
        description: "Unilateral right to change terms",
        templates: &[
            "We reserve the right to modify these terms at any time",
            "Terms may be updated without prior notice to users",
            "Company may change agreement unilaterally at sole discretion",
            "Modifications effective immediately upon posting",
        ],
    },
    TemplateSet {
        category: "account_suspension",
        kind: IndicatorKind::Risk,
        severity: Severity::High,
        weight: 15,
        description: "Unfair account termination clauses",
        templates: &[
            "We may suspend or terminate your account at any time",
            "Service termination without cause or notice",
            "Immediate account closure at company discretion",
            "User access may be revoked without explanation",
        ],
    },
    TemplateSet {
        category: "broad_liability_waiver",
        kind: IndicatorKind::Risk,
        severity: Severity::Medium,
        weight: 12,
        description: "Broad liability limitations",
        templates: &[
            "Company is not liable for any damages arising from service use",
            "We disclaim all warranties and limit maximum liability",
            "User assumes all risks of service usage",
            "No responsibility for indirect or consequential damages",
        ],
    },
    TemplateSet {
        category: "user_rights",
        kind: IndicatorKind::Positive,
        severity: Severity::Low,
        weight: 5,
        description: "User rights are spelled out",
        templates: &[
            "You have the right to access your personal data",
            "Users may request deletion of their information",
            "Data portability rights are provided to users",
            "Right to opt out of data processing",
        ],
    },
    TemplateSet {
        category: "transparency",
        kind: IndicatorKind::Positive,
        severity: Severity::Low,
        weight: 5,
        description: "Changes and practices are communicated openly",
        templates: &[
            "We will provide clear notice of any changes",
            "Users will be informed of policy updates",
            "Transparent communication about data usage",
            "Clear explanation of terms in plain language",
        ],
    },
    TemplateSet {
        category: "data_protection",
        kind: IndicatorKind::Positive,
        severity: Severity::Low,
        weight: 5,
        description: "Data is actively protected",
        templates: &[
            "Your data is encrypted and securely stored",
            "Strong security measures protect user information",
            "GDPR compliant data processing practices",
            "Privacy by design principles are followed",
        ],
    },
];

struct Centroid {
    set: &'static TemplateSet,
    vector: Vec<f32>,
}

pub struct CentroidClassifier<E: Embedder> {
    embedder: E,
    centroids: Vec<Centroid>,
}

impl<E: Embedder> CentroidClassifier<E> {
    /// Embed every template and average per category.
    ///
    /// Fails if the embedder fails on any template or returns vectors of the
    /// wrong size; a half-built classifier is never returned.
    pub fn new(embedder: E) -> Result<Self, EmbeddingError> {
        let dims = embedder.dimensions();
        let mut centroids = Vec::with_capacity(TEMPLATES.len());

        for set in TEMPLATES {
            if set.templates.is_empty() {
                return Err(EmbeddingError::NoTemplates(set.category));
            }
            let mut sum = vec![0f32; dims];
            for template in set.templates {
                let v = embedder.embed(template)?;
                if v.len() != dims {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: dims,
                        actual: v.len(),
                    });
                }
                for (acc, x) in sum.iter_mut().zip(&v) {
                    *acc += x;
                }
            }
            let n = set.templates.len() as f32;
            let vector = sum.into_iter().map(|x| x / n).collect();
            centroids.push(Centroid { set, vector });
        }

        debug!(categories = centroids.len(), dims, "centroid classifier ready");
        Ok(Self {
            embedder,
            centroids,
        })
    }
}

impl<E: Embedder> ClauseClassifier for CentroidClassifier<E> {
    fn method(&self) -> ClassificationMethod {
        ClassificationMethod::Embedding
    }

    fn is_available(&self) -> bool {
        true
    }

    fn classify(&self, sentence: &str) -> Classifications {
        let mut out = Classifications::new();
        let embedding = match self.embedder.embed(sentence) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "sentence embedding failed, skipping sentence");
                return out;
            }
        };

        for centroid in &self.centroids {
            let similarity = cosine_similarity(&embedding, &centroid.vector);
            if similarity > ACCEPTANCE_THRESHOLD {
                out.insert(
                    centroid.set.category.to_string(),
                    Classification {
                        kind: centroid.set.kind,
                        confidence: (f64::from(similarity) * 1000.0).round() / 1000.0,
                        severity: centroid.set.severity,
                        weight: centroid.set.weight,
                        description: centroid.set.description,
                    },
                );
            }
        }
        out
    }
}
