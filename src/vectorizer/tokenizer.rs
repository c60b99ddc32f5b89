use crate::config::NgramRange;
use crate::vectorizer::term::TermFrequency;
use crate::vocabulary::VocabularyNormalizer;

/// Splits text into canonical tokens and n-grams.
///
/// Text is brought to canonical form, every non-alphanumeric char acts as a
/// separator, short tokens and stopwords are removed, and n-grams are formed
/// over the surviving tokens.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    normalizer: &'a VocabularyNormalizer,
    ngram_range: NgramRange,
}

impl<'a> Tokenizer<'a> {
    pub fn new(normalizer: &'a VocabularyNormalizer, ngram_range: NgramRange) -> Self {
        Self { normalizer, ngram_range }
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        let min_chars = self.normalizer.min_token_chars();
        self.normalizer
            .canonical(text)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|tok| !tok.is_empty())
            .filter(|tok| tok.chars().count() >= min_chars)
            .filter(|tok| !self.normalizer.is_stopword(tok))
            .map(str::to_string)
            .collect()
    }

    /// Contiguous n-grams for every n in the range, shortest first.
    pub fn ngrams(&self, tokens: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        for n in self.ngram_range.min_n..=self.ngram_range.max_n {
            if n == 0 || n > tokens.len() {
                break;
            }
            out.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        out
    }

    pub fn term_frequency(&self, text: &str) -> TermFrequency {
        let tokens = self.tokens(text);
        TermFrequency::from(self.ngrams(&tokens).as_slice())
    }
}
