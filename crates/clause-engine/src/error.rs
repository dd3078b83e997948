use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that abort an analysis. Only a broken catalog qualifies; every
/// other failure degrades inside the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("pattern catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

/// Inconsistent aggregator input; the engine substitutes a fallback summary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("category {0} was reported with no occurrences")]
    EmptyCategory(String),

    #[error("category {category} counts {count} occurrences but carries {matches} matches")]
    CountMismatch {
        category: String,
        count: usize,
        matches: usize,
    },
}
