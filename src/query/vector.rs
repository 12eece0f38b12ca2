//! TF-IDF vector space scoring for similarity search.

use ahash::{AHashMap, AHashSet};
use regex::Regex;
use std::sync::LazyLock;

/// Analysis pattern: runs of two or more word characters. Single-character
/// tokens carry no weight in the vector space.
static ANALYZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Rank corpus documents against `query` by cosine similarity.
///
/// The query is fitted jointly with the corpus as one extra pseudo-document,
/// so document frequencies include it. Returns the source paths whose
/// similarity strictly exceeds `threshold`, in the order the documents were
/// scanned; scores are a cutoff here, not a sort key.
pub fn rank(documents: &[(String, String)], query: &str, threshold: f32) -> Vec<String> {
    if documents.is_empty() {
        return Vec::new();
    }

    let mut texts: Vec<&str> = documents
        .iter()
        .map(|(_, content)| content.as_str())
        .collect();
    texts.push(query);

    let space = VectorSpace::fit(&texts);
    let query_index = texts.len() - 1;

    documents
        .iter()
        .enumerate()
        .filter(|(i, _)| space.cosine(*i, query_index) > threshold)
        .map(|(_, (path, _))| path.clone())
        .collect()
}

/// TF-IDF vector space over a fixed set of texts.
///
/// Term weights use raw counts for tf and the smooth idf
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`; each vector is L2-normalized
/// at fit time, which reduces cosine similarity to a sparse dot product.
pub(crate) struct VectorSpace {
    vectors: Vec<AHashMap<String, f32>>,
}

impl VectorSpace {
    pub(crate) fn fit(texts: &[&str]) -> Self {
        let analyzed: Vec<Vec<String>> = texts.iter().map(|t| analyze(t)).collect();

        let mut df: AHashMap<&str, u32> = AHashMap::new();
        for tokens in &analyzed {
            let mut seen: AHashSet<&str> = AHashSet::new();
            for token in tokens {
                if seen.insert(token.as_str()) {
                    *df.entry(token.as_str()).or_insert(0) += 1;
                }
            }
        }

        let n = texts.len() as f32;
        let vectors = analyzed
            .iter()
            .map(|tokens| {
                let mut tf: AHashMap<&str, f32> = AHashMap::new();
                for token in tokens {
                    *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
                }

                let mut vector: AHashMap<String, f32> = AHashMap::with_capacity(tf.len());
                for (term, count) in tf {
                    let doc_freq = df.get(term).copied().unwrap_or(0) as f32;
                    // idf(t) = ln((1 + n) / (1 + df)) + 1
                    let idf = ((1.0 + n) / (1.0 + doc_freq)).ln() + 1.0;
                    vector.insert(term.to_owned(), count * idf);
                }

                normalize(&mut vector);
                vector
            })
            .collect();

        Self { vectors }
    }

    /// Cosine similarity between two fitted texts
    pub(crate) fn cosine(&self, a: usize, b: usize) -> f32 {
        let (small, large) = if self.vectors[a].len() <= self.vectors[b].len() {
            (&self.vectors[a], &self.vectors[b])
        } else {
            (&self.vectors[b], &self.vectors[a])
        };

        small
            .iter()
            .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
            .sum()
    }
}

/// L2-normalize in place. An all-zero vector (no extractable tokens) is
/// left untouched and scores zero against everything.
fn normalize(vector: &mut AHashMap<String, f32>) {
    let norm = vector.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}

/// Lowercase and extract analysis tokens from one text
pub(crate) fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    ANALYZE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_owned())
        .collect()
}
