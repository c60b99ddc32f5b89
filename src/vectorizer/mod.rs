pub mod compute;
pub mod corpus;
pub mod term;
pub mod tokenizer;

use std::collections::HashMap;

use ahash::RandomState;
use serde::Serialize;
use tracing::debug;

use crate::config::NgramRange;
use crate::error::{Result, ScoringError};
use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::{corpus::Corpus, term::TermFrequency, tokenizer::Tokenizer};
use crate::vocabulary::VocabularyNormalizer;

/// L2-normalized TF-IDF weights of one document, indexed by feature.
pub type TermVector = ZeroSpVec<f64>;

/// TF-IDF Vectorizer
/// Turns a batch of documents into TF-IDF vectors sharing one feature space.
///
/// IDF is computed over the whole batch passed to [`fit_transform`], so
/// documents that must be compared with each other have to be vectorized in
/// the same call.
///
/// Weighting:
/// - tf: raw n-gram count in the document
/// - idf: `ln((1 + n) / (1 + df)) + 1`
/// - each row scaled to unit L2 norm
///
/// [`fit_transform`]: TfIdfVectorizer::fit_transform
#[derive(Debug, Clone, Copy)]
pub struct TfIdfVectorizer<'a> {
    normalizer: &'a VocabularyNormalizer,
    ngram_range: NgramRange,
    max_features: Option<usize>,
}

impl<'a> TfIdfVectorizer<'a> {
    pub fn new(normalizer: &'a VocabularyNormalizer, ngram_range: NgramRange) -> Self {
        Self {
            normalizer,
            ngram_range,
            max_features: None,
        }
    }

    /// Keep only the `max_features` terms with the highest total count.
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Fit the vocabulary and IDF on `docs` and return their vectors in input order.
    ///
    /// Fails with [`ScoringError::InsufficientVocabulary`] when no term survives
    /// tokenization in any document.
    pub fn fit_transform<S>(&self, docs: &[S]) -> Result<DocumentMatrix>
    where
        S: AsRef<str>,
    {
        let tokenizer = Tokenizer::new(self.normalizer, self.ngram_range);
        let freqs: Vec<TermFrequency> = docs
            .iter()
            .map(|doc| tokenizer.term_frequency(doc.as_ref()))
            .collect();

        let mut corpus = Corpus::new();
        let mut collection = TermFrequency::new();
        for freq in &freqs {
            corpus.add_set(&freq.term_set_ref_str());
            collection.add_terms_from_freq(freq);
        }
        if corpus.vocab_size() == 0 {
            return Err(ScoringError::InsufficientVocabulary);
        }

        let features = self.select_features(&collection);
        let feature_index: HashMap<&str, usize, RandomState> = features
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.as_ref(), idx))
            .collect();
        let idf: Vec<f64> = features.iter().map(|term| corpus.idf(term)).collect();

        let rows = freqs
            .iter()
            .map(|freq| {
                let pairs = freq
                    .iter()
                    .filter_map(|(term, count)| {
                        feature_index
                            .get(term)
                            .map(|&idx| (idx, count as f64 * idf[idx]))
                    })
                    .collect();
                let mut row = ZeroSpVec::from_pairs(features.len(), pairs);
                row.l2_normalize();
                row
            })
            .collect();

        debug!(
            documents = docs.len(),
            vocabulary = corpus.vocab_size(),
            features = features.len(),
            "vectorized batch"
        );

        Ok(DocumentMatrix { features, idf, rows })
    }

    /// Feature list in lexicographic order, capped by total count when configured.
    fn select_features(&self, collection: &TermFrequency) -> Vec<Box<str>> {
        let mut features: Vec<Box<str>> = match self.max_features {
            Some(limit) if limit < collection.len() => collection
                .sorted_frequency_vector()
                .into_iter()
                .take(limit)
                .map(|(term, _)| term.into())
                .collect(),
            _ => collection.iter().map(|(term, _)| term.into()).collect(),
        };
        features.sort_unstable();
        features
    }
}

/// Vectors of one batch plus the feature space they live in.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMatrix {
    /// Feature names, lexicographic.
    features: Vec<Box<str>>,
    /// IDF per feature.
    idf: Vec<f64>,
    /// One row per input document, input order.
    rows: Vec<TermVector>,
}

impl DocumentMatrix {
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn features(&self) -> &[Box<str>] {
        &self.features
    }

    pub fn feature(&self, idx: usize) -> Option<&str> {
        self.features.get(idx).map(|f| f.as_ref())
    }

    pub fn idf(&self, idx: usize) -> Option<f64> {
        self.idf.get(idx).copied()
    }

    pub fn rows(&self) -> &[TermVector] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&TermVector> {
        self.rows.get(idx)
    }

    /// Split rows at position `mid`: `[0, mid)` and `[mid, n_docs)`.
    ///
    /// This is how a joint batch of pages followed by keywords is taken apart
    /// again. `mid` past the end is clamped.
    pub fn split_at(&self, mid: usize) -> (&[TermVector], &[TermVector]) {
        self.rows.split_at(mid.min(self.rows.len()))
    }

    /// `(feature, weight)` of a row, in feature order.
    pub fn weighted_terms(&self, idx: usize) -> Vec<(&str, f64)> {
        self.rows
            .get(idx)
            .map(|row| {
                row.raw_iter()
                    .filter_map(|(f, w)| self.feature(f).map(|name| (name, w)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextConfig;
    use crate::vectorizer::compute::compare::cosine;
    use approx::assert_relative_eq;

    fn normalizer() -> VocabularyNormalizer {
        VocabularyNormalizer::new(&TextConfig::default())
    }

    #[test]
    fn rows_are_unit_length_and_features_sorted() {
        let n = normalizer();
        let matrix = TfIdfVectorizer::new(&n, NgramRange::new(1, 2))
            .fit_transform(&["colegio quito", "quito norte", "colegio"])
            .unwrap();
        assert_eq!(matrix.n_docs(), 3);
        let features: Vec<&str> = matrix.features().iter().map(|f| f.as_ref()).collect();
        assert_eq!(
            features,
            vec!["colegio", "colegio quito", "norte", "quito", "quito norte"]
        );
        for row in matrix.rows() {
            assert_relative_eq!(row.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rarer_terms_get_higher_idf() {
        let n = normalizer();
        let matrix = TfIdfVectorizer::new(&n, NgramRange::new(1, 1))
            .fit_transform(&["quito colegio", "quito", "quito"])
            .unwrap();
        let colegio = matrix.features().iter().position(|f| f.as_ref() == "colegio").unwrap();
        let quito = matrix.features().iter().position(|f| f.as_ref() == "quito").unwrap();
        assert!(matrix.idf(colegio).unwrap() > matrix.idf(quito).unwrap());
        assert_relative_eq!(matrix.idf(quito).unwrap(), 1.0);
    }

    #[test]
    fn identical_documents_have_cosine_one() {
        let n = normalizer();
        let matrix = TfIdfVectorizer::new(&n, NgramRange::new(1, 3))
            .fit_transform(&["pension y matricula 2026", "historia", "pension y matricula 2026"])
            .unwrap();
        assert_relative_eq!(
            cosine(matrix.row(0).unwrap(), matrix.row(2).unwrap()),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn stopword_only_batch_is_insufficient() {
        let n = normalizer();
        let err = TfIdfVectorizer::new(&n, NgramRange::new(1, 3))
            .fit_transform(&["de la que", "", "el y a"])
            .unwrap_err();
        assert!(matches!(err, ScoringError::InsufficientVocabulary));
        let err = TfIdfVectorizer::new(&n, NgramRange::new(1, 3))
            .fit_transform::<&str>(&[])
            .unwrap_err();
        assert!(matches!(err, ScoringError::InsufficientVocabulary));
    }

    #[test]
    fn stopword_document_in_batch_gets_zero_row() {
        let n = normalizer();
        let matrix = TfIdfVectorizer::new(&n, NgramRange::new(1, 1))
            .fit_transform(&["colegio", "de la"])
            .unwrap();
        assert!(matrix.row(1).unwrap().is_zero_vector());
    }

    #[test]
    fn feature_cap_keeps_most_frequent_terms() {
        let n = normalizer();
        let matrix = TfIdfVectorizer::new(&n, NgramRange::new(1, 1))
            .with_max_features(Some(2))
            .fit_transform(&["beta alpha alpha gamma gamma gamma delta"])
            .unwrap();
        let features: Vec<&str> = matrix.features().iter().map(|f| f.as_ref()).collect();
        assert_eq!(features, vec!["alpha", "gamma"]);
    }

    #[test]
    fn split_at_separates_pages_from_keywords() {
        let n = normalizer();
        let matrix = TfIdfVectorizer::new(&n, NgramRange::new(1, 1))
            .fit_transform(&["page one", "page two", "one", "two", "three"])
            .unwrap();
        let (pages, keywords) = matrix.split_at(2);
        assert_eq!(pages.len(), 2);
        assert_eq!(keywords.len(), 3);
        let (all, none) = matrix.split_at(99);
        assert_eq!(all.len(), 5);
        assert!(none.is_empty());
    }

    #[test]
    fn weighted_terms_of_single_document() {
        let n = normalizer();
        let matrix = TfIdfVectorizer::new(&n, NgramRange::new(1, 1))
            .fit_transform(&["cupo cupo costo"])
            .unwrap();
        let terms = matrix.weighted_terms(0);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].0, "costo");
        assert_relative_eq!(terms[0].1, 1.0 / 5.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(terms[1].1, 2.0 / 5.0_f64.sqrt(), epsilon = 1e-12);
        assert!(matrix.weighted_terms(7).is_empty());
    }
}
