//! Vocabulary normalization: keyword dedup and the shared text-cleaning policy.

use std::collections::HashSet;

use ahash::RandomState;
use indexmap::IndexMap;
use serde::Serialize;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::config::TextConfig;

/// Text cleaning policy shared by the vectorizer and the classifier.
///
/// Holds the stopword list, accent folding switch and minimum token length.
/// Built once per configuration and only read afterwards.
#[derive(Debug, Clone)]
pub struct VocabularyNormalizer {
    stopwords: HashSet<Box<str>, RandomState>,
    fold_accents: bool,
    min_token_chars: usize,
}

impl VocabularyNormalizer {
    pub fn new(config: &TextConfig) -> Self {
        let mut normalizer = Self {
            stopwords: HashSet::with_hasher(RandomState::new()),
            fold_accents: config.fold_accents,
            min_token_chars: config.min_token_chars.max(1),
        };
        let stopwords = config
            .stopwords
            .iter()
            .map(|word| normalizer.canonical(word).into_boxed_str())
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>();
        normalizer.stopwords.extend(stopwords);
        normalizer
    }

    /// Lowercase, optionally fold accents, collapse whitespace.
    pub fn canonical(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let folded: String = if self.fold_accents {
            lower.nfd().filter(|c| !is_combining_mark(*c)).collect()
        } else {
            lower
        };
        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// `token` must already be in canonical form.
    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    #[inline]
    pub fn min_token_chars(&self) -> usize {
        self.min_token_chars
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Deduplicate raw keywords, keeping the first spelling of each canonical form.
    ///
    /// Blank entries are dropped. Stopwords are kept: only document text is
    /// filtered, a keyword the caller asked for is always scored.
    pub fn normalize_keywords<I, S>(&self, raw: I) -> Vocabulary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Vocabulary::default();
        for keyword in raw {
            let display = keyword.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
            if display.is_empty() {
                continue;
            }
            let key = self.canonical(&display);
            vocabulary.keywords.entry(key).or_insert(display);
        }
        vocabulary
    }
}

/// Insertion-ordered, deduplicated keyword set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    /// canonical form -> first spelling seen
    keywords: IndexMap<String, String>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.values().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.keywords.get_index(index).map(|(_, display)| display.as_str())
    }

    pub fn contains_canonical(&self, canonical: &str) -> bool {
        self.keywords.contains_key(canonical)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.keywords.values().cloned().collect()
    }
}
