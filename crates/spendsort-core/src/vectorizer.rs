//! TF-IDF vectorizer with an append-only vocabulary
//!
//! `fit` rebuilds the vocabulary and document-frequency table from scratch;
//! `transform` produces dense vectors whose length equals the vocabulary size.
//! Tokens unseen at fit time contribute nothing.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::math::safe_divide;
use crate::tokenize::tokenize;

/// Dense TF-IDF feature vector, indexed by vocabulary position
pub type FeatureVector = Vec<f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// token -> vector index, assigned in first-seen order
    vocabulary: HashMap<String, usize>,
    /// token -> number of training documents containing it
    document_frequency: HashMap<String, usize>,
    total_documents: usize,
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build vocabulary and document frequencies from a corpus
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) {
        self.vocabulary.clear();
        self.document_frequency.clear();
        self.total_documents = corpus.len();

        for document in corpus {
            let tokens = tokenize(document.as_ref());
            let mut seen: HashSet<&str> = HashSet::with_capacity(tokens.len());

            for token in &tokens {
                if !seen.insert(token.as_str()) {
                    continue;
                }
                *self.document_frequency.entry(token.clone()).or_insert(0) += 1;
                let next_index = self.vocabulary.len();
                self.vocabulary.entry(token.clone()).or_insert(next_index);
            }
        }
    }

    /// Vectorize each text against the fitted vocabulary
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Vec<FeatureVector> {
        texts
            .iter()
            .map(|text| self.transform_one(text.as_ref()))
            .collect()
    }

    /// Vectorize a single text against the fitted vocabulary
    pub fn transform_one(&self, text: &str) -> FeatureVector {
        let tokens = tokenize(text);
        let mut vector = vec![0.0; self.vocabulary.len()];

        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *term_counts.entry(token.as_str()).or_insert(0) += 1;
        }

        for (token, count) in term_counts {
            let Some(&index) = self.vocabulary.get(token) else {
                continue;
            };
            let df = self.document_frequency(token);
            if df == 0 {
                continue;
            }
            let tf = safe_divide(count as f64, tokens.len() as f64, 0.0);
            let idf = safe_divide(self.total_documents as f64, df as f64, 0.0).ln();
            vector[index] = tf * idf;
        }

        vector
    }

    /// `fit` followed by `transform` on the same corpus
    pub fn fit_transform<S: AsRef<str>>(&mut self, corpus: &[S]) -> Vec<FeatureVector> {
        self.fit(corpus);
        self.transform(corpus)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    pub fn document_frequency(&self, token: &str) -> usize {
        self.document_frequency.get(token).copied().unwrap_or(0)
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    /// Check the invariants `fit` guarantees: indices are exactly
    /// `0..vocabulary_size` and every token has a frequency in
    /// `1..=total_documents`
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.vocabulary.len()];
        for &index in self.vocabulary.values() {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }

        self.document_frequency.len() == self.vocabulary.len()
            && self.vocabulary.keys().all(|token| {
                matches!(
                    self.document_frequency.get(token),
                    Some(&df) if df >= 1 && df <= self.total_documents
                )
            })
    }
}
