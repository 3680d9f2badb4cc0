//! Corpus vocabulary with document frequencies.
//!
//! Built in a single pass over the tokenized corpus. The ranking by
//! descending document frequency (ties broken lexicographically) is computed
//! once at build time, so every top-K query is a prefix of the same list:
//! for K1 < K2 the top-K1 tokens are always contained in the top-K2 tokens.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tokenize::FeatureSet;

/// A token together with the number of records containing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedToken {
    pub token: String,
    pub document_frequency: usize,
}

/// Document-frequency index over a tokenized corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Number of records in the corpus, including those with no tokens.
    document_count: usize,

    /// Number of records containing each token.
    document_frequencies: HashMap<String, usize>,

    /// Tokens by descending document frequency, then ascending token.
    ranking: Vec<RankedToken>,
}

impl Vocabulary {
    /// Builds the vocabulary from per-record feature sets.
    pub fn from_documents(documents: &[FeatureSet]) -> Self {
        let mut document_frequencies: HashMap<String, usize> = HashMap::new();

        // Feature sets hold each token once, so this counts documents.
        for document in documents {
            for token in document {
                *document_frequencies.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let mut ranking: Vec<RankedToken> = document_frequencies
            .iter()
            .map(|(token, &df)| RankedToken {
                token: token.clone(),
                document_frequency: df,
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.document_frequency
                .cmp(&a.document_frequency)
                .then_with(|| a.token.cmp(&b.token))
        });

        Self {
            document_count: documents.len(),
            document_frequencies,
            ranking,
        }
    }

    /// Number of records the vocabulary was built from.
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    /// True when no record produced a token.
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Document frequency of a token, 0 if unseen.
    pub fn document_frequency(&self, token: &str) -> usize {
        self.document_frequencies.get(token).copied().unwrap_or(0)
    }

    /// Document frequency as a percentage of the corpus size.
    pub fn support_pct(&self, token: &str) -> f64 {
        if self.document_count == 0 {
            return 0.0;
        }
        self.document_frequency(token) as f64 * 100.0 / self.document_count as f64
    }

    /// Full ranking.
    pub fn ranked(&self) -> &[RankedToken] {
        &self.ranking
    }

    /// The `k` highest-document-frequency tokens. Returns the whole ranking
    /// if `k` exceeds the vocabulary size.
    pub fn top_k(&self, k: usize) -> &[RankedToken] {
        &self.ranking[..k.min(self.ranking.len())]
    }
}
