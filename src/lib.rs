/// This crate is a content coverage and opportunity scoring engine built on a TF-IDF Vectorizer.
pub mod classifier;
pub mod competitor;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod gaps;
pub mod ranking;
pub mod relevance;
pub mod seeds;
pub mod utils;
pub mod vectorizer;
pub mod vocabulary;

/// Scoring Engine
/// The top-level struct of this crate. It runs one audit over a site corpus,
/// a keyword list, an optional competitor corpus and optional market interest.
///
/// Internally, it holds:
/// - The immutable configuration, as `Arc<EngineConfig>`
/// - The vocabulary normalizer (stopwords, canonical text form)
/// - The commercial weight & intent classifier
///
/// A run produces:
/// - The keyword × page relevance matrix
/// - The ranked opportunity table
/// - Per-page gap reports
/// - The pooled competitor term list
///
/// The competitor path never fails a run; a matrix failure does.
///
/// # Thread Safety
/// An engine is `Send + Sync` and holds no mutable state, so it can serve
/// concurrent runs.
pub use engine::{ScoringEngine, ScoringInput, ScoringReport};

/// Engine Configuration
/// Every tunable of the engine, loadable from JSON. Missing sections fall
/// back to the defaults (Spanish stopwords, school-admissions weight table,
/// demand-gap ranking).
pub use config::EngineConfig;

/// Error type and result alias.
/// `ScoringError::is_fatal` tells run-aborting errors from the competitor-side ones.
pub use error::{Result, ScoringError};

/// TF-IDF Vectorizer
/// Vectorizes a batch of documents into one shared feature space.
///
/// - tf: raw n-gram count
/// - idf: `ln((1 + n) / (1 + df)) + 1`
/// - rows L2-normalized
pub use vectorizer::{DocumentMatrix, TfIdfVectorizer};

/// Vocabulary Normalizer
/// Canonical text form and stopword policy shared by every vectorization and
/// classification call.
pub use vocabulary::{Vocabulary, VocabularyNormalizer};

/// Relevance Matrix
/// Cosine coverage of keywords (rows) on pages (columns).
pub use relevance::{PageCorpus, RelevanceMatrix, RelevanceMatrixBuilder};

/// Commercial Weight & Intent Classifier
pub use classifier::{CommercialClassifier, Intent, IntentRule};

/// Opportunity Ranker
/// `RankingPolicy` selects between ranking by demand gap and by current
/// commercial fit; it is never chosen implicitly.
pub use ranking::{MarketInterest, OpportunityRanker, RankedRow, RankedTable, RankingPolicy};

/// Per-page gaps and strengths.
pub use gaps::{GapDetector, PageGaps, Urgency};

/// Competitor Term Extractor
pub use competitor::{CompetitorCorpus, CompetitorExtractor, CompetitorTerm};
