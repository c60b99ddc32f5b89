use std::collections::HashMap;

use ahash::RandomState;

/// TermFrequency struct
/// Counts how many times each term (n-gram) appears in one document.
///
/// # Examples
/// ```
/// use coverage_gap::vectorizer::term::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term("matricula");
/// term_freq.add_term("admision");
/// term_freq.add_term("matricula");
///
/// assert_eq!(term_freq.term_count("matricula"), 2);
/// assert_eq!(term_freq.term_sum(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermFrequency {
    term_count: HashMap<String, u64, RandomState>,
    total_term_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: HashMap::with_hasher(RandomState::new()),
            total_term_count: 0,
        }
    }

    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        self.add_term_n(term, 1)
    }

    #[inline]
    pub fn add_term_n(&mut self, term: &str, n: u64) -> &mut Self {
        if n == 0 {
            return self;
        }
        match self.term_count.get_mut(term) {
            Some(count) => *count += n,
            None => {
                self.term_count.insert(term.to_string(), n);
            }
        }
        self.total_term_count += n;
        self
    }

    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Merge another TermFrequency into self.
    pub fn add_terms_from_freq(&mut self, other: &TermFrequency) -> &mut Self {
        for (term, &count) in &other.term_count {
            self.add_term_n(term, count);
        }
        self
    }
}

impl<T> From<&[T]> for TermFrequency
where
    T: AsRef<str>,
{
    fn from(terms: &[T]) -> Self {
        let mut tf = TermFrequency::new();
        tf.add_terms(terms);
        tf
    }
}

impl TermFrequency {
    /// Iterator over `(term, count)`; order is unspecified.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total number of term occurrences.
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Distinct terms (as &str).
    #[inline]
    pub fn term_set_ref_str(&self) -> Vec<&str> {
        self.term_count.keys().map(String::as_str).collect()
    }

    /// Number of distinct terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    /// Terms sorted by count descending, ties in lexicographic order.
    pub fn sorted_frequency_vector(&self) -> Vec<(&str, u64)> {
        let mut list: Vec<(&str, u64)> = self.iter().collect();
        list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        list
    }
}
