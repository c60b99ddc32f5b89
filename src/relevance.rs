//! Relevance Matrix Builder: keyword × page cosine coverage.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::VectorizerConfig;
use crate::error::{Result, ScoringError, Shortfall};
use crate::vectorizer::{compute::compare::cosine, TfIdfVectorizer};
use crate::vocabulary::{Vocabulary, VocabularyNormalizer};

/// Ordered `label -> text` mapping of site pages.
pub type PageCorpus = IndexMap<String, String>;

/// Coverage of every keyword (rows) on every page (columns).
///
/// Cells are cosine similarities in `[0, 1]`. Rows follow vocabulary order,
/// columns follow page input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceMatrix {
    keywords: Vec<String>,
    pages: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl RelevanceMatrix {
    /// Assemble a matrix from precomputed rows; every row must have one value per page.
    pub fn from_rows(
        keywords: Vec<String>,
        pages: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Option<Self> {
        if keywords.len() != values.len() || values.iter().any(|row| row.len() != pages.len()) {
            return None;
        }
        Some(Self { keywords, pages, values })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn n_rows(&self) -> usize {
        self.keywords.len()
    }

    pub fn n_cols(&self) -> usize {
        self.pages.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.values.get(row).map(Vec::as_slice)
    }

    /// Coverage of every keyword on page `label`.
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let col = self.pages.iter().position(|p| p == label)?;
        Some(self.values.iter().map(|row| row[col]).collect())
    }

    /// Best coverage of keyword `row` across all pages.
    pub fn max_coverage(&self, row: usize) -> Option<f64> {
        self.values
            .get(row)
            .map(|r| r.iter().copied().fold(0.0, f64::max))
    }

    /// `(keyword, coverage per page)` in row order.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.keywords
            .iter()
            .zip(self.values.iter())
            .map(|(k, row)| (k.as_str(), row.as_slice()))
    }
}

pub struct RelevanceMatrixBuilder<'a> {
    normalizer: &'a VocabularyNormalizer,
    config: &'a VectorizerConfig,
}

impl<'a> RelevanceMatrixBuilder<'a> {
    pub fn new(normalizer: &'a VocabularyNormalizer, config: &'a VectorizerConfig) -> Self {
        Self { normalizer, config }
    }

    /// Vectorize pages and keywords in one batch, then compare every keyword
    /// vector with every page vector.
    ///
    /// Pages whose text is blank are skipped. Fails with
    /// [`ScoringError::InsufficientData`] when no page or keyword is left, or
    /// when the joint vocabulary is empty.
    pub fn build(&self, corpus: &PageCorpus, vocabulary: &Vocabulary) -> Result<RelevanceMatrix> {
        let pages: Vec<(&str, &str)> = corpus
            .iter()
            .filter(|(label, text)| {
                let usable = !text.trim().is_empty();
                if !usable {
                    warn!(page = label.as_str(), "skipping page without text");
                }
                usable
            })
            .map(|(label, text)| (label.as_str(), text.as_str()))
            .collect();
        if pages.is_empty() {
            return Err(ScoringError::InsufficientData(Shortfall::EmptyCorpus));
        }
        if vocabulary.is_empty() {
            return Err(ScoringError::InsufficientData(Shortfall::EmptyKeywords));
        }

        // batch layout: [page texts..] ++ [keywords..]
        let batch: Vec<&str> = pages
            .iter()
            .map(|(_, text)| *text)
            .chain(vocabulary.iter())
            .collect();
        let matrix = TfIdfVectorizer::new(self.normalizer, self.config.ngram_range)
            .with_max_features(self.config.max_features)
            .fit_transform(&batch)
            .map_err(|err| match err {
                ScoringError::InsufficientVocabulary => {
                    ScoringError::InsufficientData(Shortfall::EmptyVocabulary)
                }
                other => other,
            })?;
        let (page_vectors, keyword_vectors) = matrix.split_at(pages.len());

        let values: Vec<Vec<f64>> = keyword_vectors
            .par_iter()
            .map(|keyword| {
                page_vectors
                    .iter()
                    .map(|page| cosine(keyword, page).clamp(0.0, 1.0))
                    .collect()
            })
            .collect();

        debug!(
            keywords = vocabulary.len(),
            pages = pages.len(),
            features = matrix.n_features(),
            "built relevance matrix"
        );

        Ok(RelevanceMatrix {
            keywords: vocabulary.to_vec(),
            pages: pages.iter().map(|(label, _)| label.to_string()).collect(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use approx::assert_relative_eq;

    fn corpus(pages: &[(&str, &str)]) -> PageCorpus {
        pages.iter().map(|(l, t)| (l.to_string(), t.to_string())).collect()
    }

    fn build(pages: &[(&str, &str)], keywords: &[&str]) -> Result<RelevanceMatrix> {
        let config = EngineConfig::default();
        let normalizer = VocabularyNormalizer::new(&config.text);
        let vocabulary = normalizer.normalize_keywords(keywords);
        RelevanceMatrixBuilder::new(&normalizer, &config.vectorizer)
            .build(&corpus(pages), &vocabulary)
    }

    #[test]
    fn shape_follows_vocabulary_and_page_order() {
        let m = build(
            &[("Home", "colegio en quito"), ("Admisiones", "matricula y pension 2026")],
            &["pension", "colegio quito", "historia"],
        )
        .unwrap();
        assert_eq!(m.pages(), &["Home".to_string(), "Admisiones".to_string()]);
        assert_eq!(m.keywords(), &["pension", "colegio quito", "historia"]);
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 2);
    }

    #[test]
    fn keyword_covers_the_page_that_mentions_it() {
        let m = build(
            &[("Home", "colegio en quito"), ("Admisiones", "matricula y pension 2026")],
            &["pension", "historia"],
        )
        .unwrap();
        assert_eq!(m.get(0, 0), Some(0.0));
        assert!(m.get(0, 1).unwrap() > 0.0);
        assert_eq!(m.max_coverage(1), Some(0.0));
        assert_eq!(m.column("Admisiones").unwrap().len(), 2);
        assert!(m.column("Missing").is_none());
    }

    #[test]
    fn keyword_equal_to_page_text_is_fully_covered() {
        let m = build(
            &[("A", "bachillerato tecnico informatica"), ("B", "colegio bachillerato")],
            &["bachillerato tecnico informatica"],
        )
        .unwrap();
        assert_relative_eq!(m.get(0, 0).unwrap(), 1.0, epsilon = 1e-9);
        assert!(m.get(0, 1).unwrap() < m.get(0, 0).unwrap());
    }

    #[test]
    fn stopword_keyword_has_zero_coverage_everywhere() {
        let m = build(&[("Home", "sobre nosotros colegio")], &["sobre", "colegio"]).unwrap();
        assert_eq!(m.row(0), Some(&[0.0][..]));
        assert!(m.get(1, 0).unwrap() > 0.0);
    }

    #[test]
    fn empty_inputs_are_insufficient_data() {
        assert!(matches!(
            build(&[], &["colegio"]),
            Err(ScoringError::InsufficientData(Shortfall::EmptyCorpus))
        ));
        assert!(matches!(
            build(&[("Home", "   ")], &["colegio"]),
            Err(ScoringError::InsufficientData(Shortfall::EmptyCorpus))
        ));
        assert!(matches!(
            build(&[("Home", "colegio")], &[]),
            Err(ScoringError::InsufficientData(Shortfall::EmptyKeywords))
        ));
        assert!(matches!(
            build(&[("Home", "de la que")], &["el", "y"]),
            Err(ScoringError::InsufficientData(Shortfall::EmptyVocabulary))
        ));
    }

    #[test]
    fn blank_pages_are_dropped_from_columns() {
        let m = build(&[("Empty", ""), ("Home", "colegio")], &["colegio"]).unwrap();
        assert_eq!(m.pages(), &["Home".to_string()]);
    }

    #[test]
    fn from_rows_checks_shape() {
        let ok = RelevanceMatrix::from_rows(
            vec!["a".into()],
            vec!["p".into(), "q".into()],
            vec![vec![0.1, 0.2]],
        );
        assert!(ok.is_some());
        let bad =
            RelevanceMatrix::from_rows(vec!["a".into()], vec!["p".into()], vec![vec![0.1, 0.2]]);
        assert!(bad.is_none());
    }
}
