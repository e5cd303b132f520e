//! Vocabulary indexer: frequency-filtered vocabulary with UNK/PAD sentinels
//! and fixed-length padded id sequences.

use std::collections::HashMap;

use ndarray::Array2;
use rand::prelude::*;

use crate::{CiteBenchError, Result};

use super::preprocess::tokenize;

/// Index of the UNK sentinel in every fitted vocabulary
pub const UNK_IX: usize = 0;
/// Index of the PAD sentinel in every fitted vocabulary
pub const PAD_IX: usize = 1;

/// Vocabulary indexer configuration.
///
/// Tokens are kept when their total corpus frequency lies in
/// `[min_count, max_count_ratio * n_documents]`; the vocabulary is prefixed
/// with UNK and PAD sentinels.
#[derive(Clone, Debug)]
pub struct VocabIndex {
    /// Minimum total token frequency
    pub min_count: usize,
    /// Maximum total frequency as a multiple of the corpus size
    pub max_count_ratio: f64,
    /// Cap on the padded sequence length
    pub max_len: Option<usize>,
    /// Seed for out-of-vocabulary pretrained vectors
    pub seed: u64,
}

impl Default for VocabIndex {
    fn default() -> Self {
        VocabIndex {
            min_count: 3,
            max_count_ratio: 0.7,
            max_len: None,
            seed: 42,
        }
    }
}

/// Result of indexing a corpus
#[derive(Clone, Debug)]
pub struct IndexedCorpus {
    /// Vocabulary, sentinels first
    pub tokens: Vec<String>,
    /// Token to id map over `tokens`
    pub token_to_id: HashMap<String, usize>,
    /// Padded id matrix, one row per document; ids are right-aligned and the
    /// left side is filled with PAD
    pub matrix: Array2<usize>,
    /// Optional pretrained embedding per vocabulary entry
    pub embeddings: Option<Array2<f32>>,
}

impl IndexedCorpus {
    /// Vocabulary size including sentinels
    pub fn n_tokens(&self) -> usize {
        self.tokens.len()
    }
}

impl VocabIndex {
    /// Fit the vocabulary and index the corpus.
    pub fn fit(&self, texts: &[String]) -> Result<IndexedCorpus> {
        self.fit_inner(texts, None)
    }

    /// Fit and additionally assemble a pretrained embedding matrix: PAD maps
    /// to all-ones, known tokens to their vector, the rest to seeded uniform
    /// noise.
    pub fn fit_with_vectors(
        &self,
        texts: &[String],
        vectors: &HashMap<String, Vec<f32>>,
    ) -> Result<IndexedCorpus> {
        self.fit_inner(texts, Some(vectors))
    }

    fn fit_inner(
        &self,
        texts: &[String],
        vectors: Option<&HashMap<String, Vec<f32>>>,
    ) -> Result<IndexedCorpus> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();

        // Total corpus frequencies in first-occurrence order
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for doc in &docs {
            for token in doc {
                let entry = counts.entry(token.clone()).or_insert(0);
                if *entry == 0 {
                    order.push(token.clone());
                }
                *entry += 1;
            }
        }

        let max_count = (texts.len() as f64 * self.max_count_ratio) as usize;
        let mut tokens = vec!["UNK".to_string(), "PAD".to_string()];
        tokens.extend(
            order
                .into_iter()
                .filter(|t| (self.min_count..=max_count).contains(&counts[t])),
        );

        let token_to_id: HashMap<String, usize> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        let matrix = self.as_matrix(&docs, &token_to_id)?;

        let embeddings = match vectors {
            Some(vectors) => Some(self.embedding_matrix(&tokens, vectors)?),
            None => None,
        };

        Ok(IndexedCorpus {
            tokens,
            token_to_id,
            matrix,
            embeddings,
        })
    }

    /// Convert tokenized documents into a padded id matrix.
    fn as_matrix(
        &self,
        docs: &[Vec<String>],
        token_to_id: &HashMap<String, usize>,
    ) -> Result<Array2<usize>> {
        let longest = docs.iter().map(Vec::len).max().unwrap_or(0);
        let max_len = self.max_len.map_or(longest, |cap| longest.min(cap));
        if max_len == 0 {
            return Err(CiteBenchError::FeatureError(
                "all documents tokenized to empty sequences".to_string(),
            ));
        }

        let mut matrix = Array2::from_elem((docs.len(), max_len), PAD_IX);
        for (i, doc) in docs.iter().enumerate() {
            let ids: Vec<usize> = doc
                .iter()
                .take(max_len)
                .map(|t| *token_to_id.get(t).unwrap_or(&UNK_IX))
                .collect();
            let start = max_len - ids.len();
            for (k, &id) in ids.iter().enumerate() {
                matrix[[i, start + k]] = id;
            }
        }
        Ok(matrix)
    }

    fn embedding_matrix(
        &self,
        tokens: &[String],
        vectors: &HashMap<String, Vec<f32>>,
    ) -> Result<Array2<f32>> {
        let dim = vectors
            .values()
            .next()
            .map(Vec::len)
            .ok_or_else(|| CiteBenchError::FeatureError("empty word-vector table".to_string()))?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut embs = Array2::zeros((tokens.len(), dim));
        for (i, token) in tokens.iter().enumerate() {
            if token == "PAD" {
                embs.row_mut(i).fill(1.0);
            } else if let Some(v) = vectors.get(token) {
                if v.len() != dim {
                    return Err(CiteBenchError::FeatureError(format!(
                        "word vector for {:?} has dimension {} (expected {})",
                        token,
                        v.len(),
                        dim
                    )));
                }
                for (j, &x) in v.iter().enumerate() {
                    embs[[i, j]] = x;
                }
            } else {
                for j in 0..dim {
                    embs[[i, j]] = rng.gen::<f32>();
                }
            }
        }
        Ok(embs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "graph graph graph learning".to_string(),
            "graph learning text".to_string(),
            "learning text rare".to_string(),
        ]
    }

    #[test]
    fn test_vocab_filtering() {
        let index = VocabIndex {
            min_count: 3,
            max_count_ratio: 2.0,
            ..Default::default()
        };
        let out = index.fit(&corpus()).unwrap();

        // graph: 4, learning: 3, text: 2, rare: 1 -> graph and learning kept
        assert_eq!(out.tokens[UNK_IX], "UNK");
        assert_eq!(out.tokens[PAD_IX], "PAD");
        assert_eq!(out.n_tokens(), 4);
        assert!(out.token_to_id.contains_key("graph"));
        assert!(!out.token_to_id.contains_key("rare"));
    }

    #[test]
    fn test_max_count_excludes_frequent() {
        // max_count = 3 * 1.0 = 3 excludes "graph" (4 occurrences)
        let index = VocabIndex {
            min_count: 1,
            max_count_ratio: 1.0,
            ..Default::default()
        };
        let out = index.fit(&corpus()).unwrap();
        assert!(!out.token_to_id.contains_key("graph"));
        assert!(out.token_to_id.contains_key("learning"));
    }

    #[test]
    fn test_left_padding() {
        let index = VocabIndex {
            min_count: 1,
            max_count_ratio: 10.0,
            ..Default::default()
        };
        let out = index.fit(&corpus()).unwrap();

        // Longest document has 4 tokens; shorter rows are left-padded
        assert_eq!(out.matrix.ncols(), 4);
        assert_eq!(out.matrix[[1, 0]], PAD_IX);
        assert_ne!(out.matrix[[1, 3]], PAD_IX);
    }

    #[test]
    fn test_max_len_truncation() {
        let index = VocabIndex {
            min_count: 1,
            max_count_ratio: 10.0,
            max_len: Some(2),
            ..Default::default()
        };
        let out = index.fit(&corpus()).unwrap();
        assert_eq!(out.matrix.ncols(), 2);
    }

    #[test]
    fn test_unknown_maps_to_unk() {
        let index = VocabIndex {
            min_count: 3,
            max_count_ratio: 2.0,
            ..Default::default()
        };
        let out = index.fit(&corpus()).unwrap();
        // Last document: learning text rare -> text and rare are OOV
        let row = out.matrix.row(2);
        assert!(row.iter().any(|&id| id == UNK_IX));
    }

    #[test]
    fn test_pretrained_matrix() {
        let mut vectors = HashMap::new();
        vectors.insert("graph".to_string(), vec![0.5, 0.5]);
        let index = VocabIndex {
            min_count: 1,
            max_count_ratio: 10.0,
            ..Default::default()
        };
        let out = index.fit_with_vectors(&corpus(), &vectors).unwrap();
        let embs = out.embeddings.unwrap();

        assert_eq!(embs.ncols(), 2);
        // PAD row is all ones, known token keeps its vector
        assert_eq!(embs[[PAD_IX, 0]], 1.0);
        let graph_id = out.token_to_id["graph"];
        assert_eq!(embs[[graph_id, 0]], 0.5);
    }

    #[test]
    fn test_all_empty_documents() {
        let index = VocabIndex::default();
        let res = index.fit(&vec!["of the a".to_string()]);
        assert!(res.is_err());
    }
}
