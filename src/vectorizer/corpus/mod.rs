use ahash::RandomState;
use indexmap::IndexMap;

/// Document frequencies of one vectorization batch.
///
/// Does not store document text; it only counts:
/// - the number of documents
/// - the number of documents each term appears in
///
/// Base data for the IDF calculation.
#[derive(Debug, Clone)]
pub struct Corpus {
    doc_num: u64,
    /// term -> number of documents containing it, in first-seen order
    term_counts: IndexMap<Box<str>, u64, RandomState>,
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_counts: IndexMap::with_hasher(RandomState::new()),
        }
    }

    /// Add one document's distinct terms.
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            match self.term_counts.get_mut(term.as_ref()) {
                Some(count) => *count += 1,
                None => {
                    self.term_counts.insert(term.as_ref().into(), 1);
                }
            }
        }
    }

    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `term`.
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms.
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// Smoothed inverse document frequency:
    /// idf(t) = ln((1 + n) / (1 + df(t))) + 1
    ///
    /// Never below 1, so a term present in every document still carries weight.
    #[inline]
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.doc_num as f64;
        let df = self.get_term_count(term) as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }
}
