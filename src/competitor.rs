//! Competitor Term Extractor: terms competitors emphasize, pooled into one signal.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::classifier::{CommercialClassifier, Intent};
use crate::config::CompetitorConfig;
use crate::error::{Result, ScoringError};
use crate::vectorizer::TfIdfVectorizer;
use crate::vocabulary::VocabularyNormalizer;

/// Ordered `url -> text` mapping of competitor pages.
pub type CompetitorCorpus = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorTerm {
    pub term: String,
    pub score: f64,
    pub commercial_weight: f64,
    pub intent: Intent,
}

pub struct CompetitorExtractor<'a> {
    normalizer: &'a VocabularyNormalizer,
    classifier: &'a CommercialClassifier,
    config: &'a CompetitorConfig,
}

impl<'a> CompetitorExtractor<'a> {
    pub fn new(
        normalizer: &'a VocabularyNormalizer,
        classifier: &'a CommercialClassifier,
        config: &'a CompetitorConfig,
    ) -> Self {
        Self { normalizer, classifier, config }
    }

    /// Rank the terms of all competitor texts pooled into a single document.
    ///
    /// The pool cannot attribute a term to a specific competitor. Fails with
    /// [`ScoringError::EmptyCompetitorData`] when there is no text at all and
    /// with [`ScoringError::InsufficientVocabulary`] when nothing survives
    /// tokenization.
    pub fn extract(&self, corpus: &CompetitorCorpus) -> Result<Vec<CompetitorTerm>> {
        let pooled = corpus
            .values()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if pooled.is_empty() {
            return Err(ScoringError::EmptyCompetitorData);
        }

        let matrix = TfIdfVectorizer::new(self.normalizer, self.config.ngram_range)
            .with_max_features(Some(self.config.max_features))
            .fit_transform(&[pooled])?;

        let mut terms: Vec<CompetitorTerm> = matrix
            .weighted_terms(0)
            .into_iter()
            .filter(|(term, _)| self.keeps(term))
            .map(|(term, tfidf)| {
                let profile = self.classifier.profile(term);
                let score = if self.config.apply_commercial_weight {
                    tfidf * profile.commercial_weight
                } else {
                    tfidf
                };
                CompetitorTerm {
                    term: term.to_string(),
                    score,
                    commercial_weight: profile.commercial_weight,
                    intent: profile.intent,
                }
            })
            .filter(|t| t.score > self.config.min_score)
            .collect();

        terms.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
        terms.truncate(self.config.top_k);

        debug!(
            competitors = corpus.len(),
            features = matrix.n_features(),
            kept = terms.len(),
            "extracted competitor terms"
        );
        Ok(terms)
    }

    fn keeps(&self, term: &str) -> bool {
        let numeric = term.chars().all(|c| c.is_ascii_digit() || c == '.');
        !numeric && term.chars().count() >= self.config.min_term_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use std::sync::Arc;

    struct Fixture {
        config: EngineConfig,
        normalizer: Arc<VocabularyNormalizer>,
        classifier: CommercialClassifier,
    }

    fn fixture(config: EngineConfig) -> Fixture {
        let normalizer = Arc::new(VocabularyNormalizer::new(&config.text));
        let classifier = CommercialClassifier::new(normalizer.clone(), &config.classifier);
        Fixture { config, normalizer, classifier }
    }

    fn corpus(docs: &[(&str, &str)]) -> CompetitorCorpus {
        docs.iter().map(|(u, t)| (u.to_string(), t.to_string())).collect()
    }

    fn extract(f: &Fixture, docs: &[(&str, &str)]) -> Result<Vec<CompetitorTerm>> {
        CompetitorExtractor::new(&f.normalizer, &f.classifier, &f.config.competitor)
            .extract(&corpus(docs))
    }

    #[test]
    fn empty_corpus_is_reported() {
        let f = fixture(EngineConfig::default());
        assert!(matches!(extract(&f, &[]), Err(ScoringError::EmptyCompetitorData)));
        assert!(matches!(
            extract(&f, &[("https://a.ec", "  "), ("https://b.ec", "")]),
            Err(ScoringError::EmptyCompetitorData)
        ));
    }

    #[test]
    fn stopword_corpus_has_no_vocabulary() {
        let f = fixture(EngineConfig::default());
        assert!(matches!(
            extract(&f, &[("https://a.ec", "de la que el en")]),
            Err(ScoringError::InsufficientVocabulary)
        ));
    }

    #[test]
    fn commercial_terms_are_boosted_and_annotated() {
        let f = fixture(EngineConfig::default());
        let terms = extract(
            &f,
            &[
                ("https://a.ec", "pension colegio deportes"),
                ("https://b.ec", "colegio deportes pension"),
            ],
        )
        .unwrap();
        assert_eq!(terms[0].term, "pension");
        assert_eq!(terms[0].intent, Intent::Transactional);
        assert_eq!(terms[0].commercial_weight, 1.5);
        for pair in terms.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn numeric_and_short_terms_are_dropped() {
        let f = fixture(EngineConfig::default());
        let terms = extract(&f, &[("https://a.ec", "2026 2026 ab ab colegio")]).unwrap();
        let names: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
        assert!(names.contains(&"colegio"));
        assert!(!names.contains(&"2026"));
        assert!(!names.contains(&"ab"));
        // bigrams are not numeric-only
        assert!(names.contains(&"2026 2026"));
    }

    #[test]
    fn informative_words_outrank_boilerplate() {
        let mut config = EngineConfig::default();
        config.competitor.apply_commercial_weight = false;
        let f = fixture(config);
        let terms = extract(
            &f,
            &[
                ("https://a.ec", "inicio | bachillerato tecnico informatica"),
                ("https://b.ec", "contacto | bachillerato tecnico informatica"),
            ],
        )
        .unwrap();
        let rank = |name: &str| terms.iter().position(|t| t.term == name).unwrap();
        for word in ["bachillerato", "tecnico", "informatica"] {
            assert!(rank(word) < rank("inicio"), "{word} should outrank inicio");
            assert!(rank(word) < rank("contacto"), "{word} should outrank contacto");
        }
    }

    #[test]
    fn top_k_and_ties_are_deterministic() {
        let mut config = EngineConfig::default();
        config.competitor.top_k = 2;
        config.competitor.apply_commercial_weight = false;
        config.competitor.ngram_range = crate::config::NgramRange::new(1, 1);
        let f = fixture(config);
        let terms = extract(&f, &[("https://a.ec", "zorro arbol casa")]).unwrap();
        let names: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["arbol", "casa"]);
    }

    #[test]
    fn min_score_filters_weak_terms() {
        let mut config = EngineConfig::default();
        config.competitor.min_score = 0.9;
        let f = fixture(config);
        let terms = extract(&f, &[("https://a.ec", "colegio escuela")]).unwrap();
        assert!(terms.is_empty());
    }
}
