//! Tokenization and n-gram generation for device names.
//!
//! Processing steps:
//! 1. Lowercase and strip punctuation (anything neither alphanumeric nor
//!    whitespace is removed, so `x-ray` becomes `xray`)
//! 2. Split on Unicode word boundaries
//! 3. Stem every word with the English Snowball stemmer
//! 4. Emit every contiguous n-gram of order 1 through `max_ngram`, words
//!    joined by a single space
//!
//! The result per record is a set: document frequency and incidence only
//! care whether a feature occurs, not how often.

use rayon::prelude::*;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// Distinct features of one record, in lexicographic order.
pub type FeatureSet = BTreeSet<String>;

/// Default highest n-gram order.
pub const DEFAULT_MAX_NGRAM: usize = 3;

/// Stateless tokenizer producing stemmed n-gram feature sets.
///
/// The stemmer is only ever borrowed immutably, so one tokenizer can be
/// shared across worker threads and always yields the same output for the
/// same text.
pub struct Tokenizer {
    max_ngram: usize,
    stemmer: Stemmer,
}

impl Tokenizer {
    /// Creates a tokenizer generating n-grams up to `max_ngram` (at least 1).
    pub fn new(max_ngram: usize) -> Self {
        Self {
            max_ngram: max_ngram.max(1),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Highest n-gram order produced.
    pub fn max_ngram(&self) -> usize {
        self.max_ngram
    }

    /// Normalized, stemmed words of a text in input order.
    pub fn words(&self, text: &str) -> Vec<String> {
        let cleaned = strip_punctuation(text);
        cleaned
            .unicode_words()
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect()
    }

    /// Feature set of a single text. Empty or whitespace-only text yields an
    /// empty set.
    pub fn tokenize(&self, text: &str) -> FeatureSet {
        let words = self.words(text);
        let mut features = FeatureSet::new();

        for n in 1..=self.max_ngram.min(words.len()) {
            for window in words.windows(n) {
                features.insert(window.join(" "));
            }
        }
        features
    }

    /// Tokenizes every text, in parallel, preserving input order.
    pub fn tokenize_all<S>(&self, texts: &[S]) -> Vec<FeatureSet>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.tokenize(t.as_ref())).collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NGRAM)
    }
}

/// Lowercases and removes every character that is neither alphanumeric nor
/// whitespace.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
