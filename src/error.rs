//! Error types for the scoring engine.

use std::fmt;

use thiserror::Error;

/// Why a run could not produce a relevance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// No site page text was supplied.
    EmptyCorpus,
    /// The keyword list was empty after normalization.
    EmptyKeywords,
    /// Every term was filtered out (stopwords, empty strings).
    EmptyVocabulary,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::EmptyCorpus => write!(f, "site corpus is empty"),
            Shortfall::EmptyKeywords => write!(f, "keyword list is empty"),
            Shortfall::EmptyVocabulary => write!(f, "no terms remain after stopword removal"),
        }
    }
}

/// Top-level error type for scoring operations.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Fatal for the run: the matrix cannot be built.
    #[error("insufficient data: {0}")]
    InsufficientData(Shortfall),

    /// The vectorizer found no surviving terms in the whole batch.
    #[error("insufficient vocabulary: no terms remain in the document batch")]
    InsufficientVocabulary,

    /// No competitor text was supplied.
    #[error("competitor corpus is empty")]
    EmptyCompetitorData,

    /// Invalid configuration values.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScoringError {
    /// Whether the error must abort report generation.
    ///
    /// Competitor-side shortfalls only drop the competitor section.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ScoringError::EmptyCompetitorData | ScoringError::InsufficientVocabulary
        )
    }
}

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;
