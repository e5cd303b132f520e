//! Bag-of-words and TF-IDF vectorizers

use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{CiteBenchError, Result};

use super::preprocess::tokenize;
use super::TextTransformer;

/// Vocabulary filtering options shared by both vectorizers
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Keep tokens appearing in at least this many documents
    pub min_df: usize,
    /// Keep tokens appearing in at most this fraction of documents
    pub max_df: f64,
    /// Cap the vocabulary to the most frequent tokens, if set
    pub max_features: Option<usize>,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            min_df: 1,
            max_df: 1.0,
            max_features: None,
        }
    }
}

/// Build a document-frequency-filtered vocabulary, sorted for determinism.
fn build_vocabulary(
    docs: &[Vec<String>],
    config: &VectorizerConfig,
) -> Result<HashMap<String, usize>> {
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for doc in docs {
        let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        for t in seen {
            *doc_freq.entry(t).or_insert(0) += 1;
        }
    }

    let max_df_count = (docs.len() as f64 * config.max_df).floor() as usize;
    let mut kept: Vec<(&str, usize)> = doc_freq
        .into_iter()
        .filter(|&(_, df)| df >= config.min_df && df <= max_df_count)
        .collect();

    if let Some(max_features) = config.max_features {
        // Most frequent first, token as tie-break
        kept.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        kept.truncate(max_features);
    }
    kept.sort_by(|a, b| a.0.cmp(b.0));

    if kept.is_empty() {
        return Err(CiteBenchError::FeatureError(
            "vocabulary is empty after document-frequency filtering".to_string(),
        ));
    }

    Ok(kept
        .into_iter()
        .enumerate()
        .map(|(i, (t, _))| (t.to_string(), i))
        .collect())
}

fn count_matrix(docs: &[Vec<String>], vocab: &HashMap<String, usize>) -> Array2<f32> {
    let mut counts = Array2::zeros((docs.len(), vocab.len()));
    for (i, doc) in docs.iter().enumerate() {
        for token in doc {
            if let Some(&j) = vocab.get(token) {
                counts[[i, j]] += 1.0;
            }
        }
    }
    counts
}

/// Bag-of-words vectorizer: token counts over a filtered vocabulary
#[derive(Clone, Debug, Default)]
pub struct BagOfWords {
    config: VectorizerConfig,
    vocab: HashMap<String, usize>,
}

impl BagOfWords {
    /// Create with default filtering
    pub fn new() -> Self {
        Self::with_config(VectorizerConfig::default())
    }

    /// Create with explicit filtering options
    pub fn with_config(config: VectorizerConfig) -> Self {
        BagOfWords {
            config,
            vocab: HashMap::new(),
        }
    }

    /// Fitted vocabulary size
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }
}

impl TextTransformer for BagOfWords {
    fn fit_transform(&mut self, texts: &[String]) -> Result<Array2<f32>> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();
        self.vocab = build_vocabulary(&docs, &self.config)?;
        Ok(count_matrix(&docs, &self.vocab))
    }

    fn dim(&self) -> usize {
        self.vocab.len()
    }

    fn name(&self) -> &'static str {
        "BOW"
    }
}

/// TF-IDF vectorizer with smoothed idf and l2-normalized rows
#[derive(Clone, Debug, Default)]
pub struct Tfidf {
    config: VectorizerConfig,
    vocab: HashMap<String, usize>,
}

impl Tfidf {
    /// Create with default filtering
    pub fn new() -> Self {
        Self::with_config(VectorizerConfig::default())
    }

    /// Create with explicit filtering options
    pub fn with_config(config: VectorizerConfig) -> Self {
        Tfidf {
            config,
            vocab: HashMap::new(),
        }
    }
}

impl TextTransformer for Tfidf {
    fn fit_transform(&mut self, texts: &[String]) -> Result<Array2<f32>> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();
        self.vocab = build_vocabulary(&docs, &self.config)?;
        let mut m = count_matrix(&docs, &self.vocab);

        let n_docs = docs.len() as f32;
        let mut idf = vec![0.0f32; self.vocab.len()];
        for (j, idf_j) in idf.iter_mut().enumerate() {
            let df = m.column(j).iter().filter(|&&c| c > 0.0).count() as f32;
            // Smoothed idf, never negative
            *idf_j = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
        }

        for mut row in m.rows_mut() {
            for (j, x) in row.iter_mut().enumerate() {
                *x *= idf[j];
            }
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|x| x / norm);
            }
        }
        Ok(m)
    }

    fn dim(&self) -> usize {
        self.vocab.len()
    }

    fn name(&self) -> &'static str {
        "TFIDF"
    }
}
