//! TF-IDF vector space over posting descriptions.
//!
//! Fit once at startup, then used read-only to project query text into the
//! same space. Vectors are dense and L2-normalized; the catalog is small enough
//! that sparse storage buys nothing.

use std::collections::HashMap;

use thiserror::Error;

use crate::catalog::stop_words::is_stop_word;

/// Upper bound on vocabulary size. Terms beyond it are dropped by corpus frequency.
pub const MAX_FEATURES: usize = 2000;

#[derive(Debug, Error, PartialEq)]
pub enum VectorizerError {
    #[error("cannot fit a vocabulary over an empty corpus")]
    EmptyCorpus,
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fits vocabulary and smoothed IDF weights over `documents`.
    ///
    /// Keeps at most `max_features` terms, ranked by total occurrences across
    /// the corpus with ties broken alphabetically. Indices are then assigned in
    /// alphabetical order.
    pub fn fit(documents: &[&str], max_features: usize) -> Result<Self, VectorizerError> {
        if documents.is_empty() {
            return Err(VectorizerError::EmptyCorpus);
        }

        let mut corpus_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let counts = term_counts(doc);
            for (term, count) in counts {
                *corpus_counts.entry(term.clone()).or_default() += count;
                *doc_freq.entry(term).or_default() += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        // smooth_idf: ln((1 + n) / (1 + df)) + 1
        let n = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, i))
            .collect();

        Ok(Self { vocabulary, idf })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    #[cfg(test)]
    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Projects `text` into the fitted space. Out-of-vocabulary terms are
    /// ignored; text with no known terms maps to the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.idf.len()];
        for (term, count) in term_counts(text) {
            if let Some(&i) = self.vocabulary.get(&term) {
                vector[i] = count as f64 * self.idf[i];
            }
        }
        l2_normalize(&mut vector);
        vector
    }
}

/// Lowercases and splits on anything that is not a word character, keeping
/// tokens of two or more characters that are not stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    // Lowercase first: it can change the char count and the split points.
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|s| s.chars().count() >= 2)
        .filter(|s| !is_stop_word(s))
        .map(String::from)
        .collect()
}

/// Cosine similarity clamped to [0, 1]. Zero vectors and mismatched
/// dimensions score 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "vector dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

fn term_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_default() += 1;
    }
    counts
}

fn l2_normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}
