//! Word-embedding text transformer
//!
//! Documents become the mean of their token vectors. Vectors either come
//! from skip-gram training on the corpus itself (tokenized documents play
//! the role of walks) or from a pretrained GloVe-format text file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::embedding::{SkipGram, SkipGramConfig};
use crate::{CiteBenchError, Result};

use super::preprocess::tokenize;
use super::TextTransformer;

/// Where word vectors come from
#[derive(Clone, Debug)]
enum VectorSource {
    /// Train skip-gram on the corpus
    Train,
    /// Load a GloVe-format text file (`token v1 v2 ...` per line)
    Pretrained(PathBuf),
}

/// Word-embedding transformer configuration
#[derive(Clone, Debug)]
pub struct WordEmbeddingConfig {
    /// Embedding dimension (ignored for pretrained vectors, which carry
    /// their own dimension)
    pub dim: usize,
    /// Drop corpus tokens rarer than this before training
    pub min_count: usize,
    /// Skip-gram settings used in trained mode
    pub skipgram: SkipGramConfig,
}

impl Default for WordEmbeddingConfig {
    fn default() -> Self {
        WordEmbeddingConfig {
            dim: 100,
            min_count: 2,
            skipgram: SkipGramConfig::default(),
        }
    }
}

/// Mean-of-word-vectors text transformer
#[derive(Clone, Debug)]
pub struct WordEmbedding {
    config: WordEmbeddingConfig,
    source: VectorSource,
    dim: usize,
}

impl WordEmbedding {
    /// Train vectors of the given dimension on the corpus
    pub fn trained(dim: usize) -> Self {
        let config = WordEmbeddingConfig {
            dim,
            skipgram: SkipGramConfig {
                dim,
                ..Default::default()
            },
            ..Default::default()
        };
        WordEmbedding {
            config,
            source: VectorSource::Train,
            dim,
        }
    }

    /// Use pretrained vectors from a GloVe-format text file
    pub fn pretrained(path: impl Into<PathBuf>) -> Self {
        WordEmbedding {
            config: WordEmbeddingConfig::default(),
            source: VectorSource::Pretrained(path.into()),
            dim: 0,
        }
    }

    fn fit_trained(&mut self, docs: &[Vec<String>]) -> Result<Array2<f32>> {
        // Corpus vocabulary in first-occurrence order
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for doc in docs {
            for token in doc {
                let entry = counts.entry(token).or_insert(0);
                if *entry == 0 {
                    order.push(token);
                }
                *entry += 1;
            }
        }
        let vocab: HashMap<&str, usize> = order
            .iter()
            .filter(|t| counts[*t] >= self.config.min_count)
            .enumerate()
            .map(|(i, &t)| (t, i))
            .collect();
        if vocab.is_empty() {
            return Err(CiteBenchError::FeatureError(
                "word-embedding vocabulary is empty after frequency filtering".to_string(),
            ));
        }

        let sequences: Vec<Vec<usize>> = docs
            .iter()
            .map(|doc| {
                doc.iter()
                    .filter_map(|t| vocab.get(t.as_str()).copied())
                    .collect()
            })
            .collect();

        let mut frequencies = vec![0usize; vocab.len()];
        for sequence in &sequences {
            for &id in sequence {
                frequencies[id] += 1;
            }
        }

        let mut model = SkipGram::new(vocab.len(), self.config.skipgram.clone());
        model.build_neg_table(&frequencies);
        model.train(&sequences);

        self.dim = model.dim();
        Ok(mean_pool_ids(&sequences, model.embeddings(), self.dim))
    }

    fn fit_pretrained(&mut self, docs: &[Vec<String>], path: &Path) -> Result<Array2<f32>> {
        let vectors = load_word_vectors(path)?;
        let dim = vectors
            .values()
            .next()
            .map(Vec::len)
            .ok_or_else(|| CiteBenchError::FeatureError("empty word-vector file".to_string()))?;
        self.dim = dim;

        let mut out = Array2::zeros((docs.len(), dim));
        for (i, doc) in docs.iter().enumerate() {
            let mut hit = 0usize;
            for token in doc {
                if let Some(v) = vectors.get(token.as_str()) {
                    for (j, &x) in v.iter().enumerate() {
                        out[[i, j]] += x;
                    }
                    hit += 1;
                }
            }
            if hit > 0 {
                let inv = 1.0 / hit as f32;
                out.row_mut(i).mapv_inplace(|x| x * inv);
            }
        }
        Ok(out)
    }
}

fn mean_pool_ids(sequences: &[Vec<usize>], embeddings: &Array2<f32>, dim: usize) -> Array2<f32> {
    let mut out = Array2::zeros((sequences.len(), dim));
    for (i, sequence) in sequences.iter().enumerate() {
        if sequence.is_empty() {
            continue;
        }
        for &id in sequence {
            let row = embeddings.row(id);
            out.row_mut(i).scaled_add(1.0, &row);
        }
        let inv = 1.0 / sequence.len() as f32;
        out.row_mut(i).mapv_inplace(|x| x * inv);
    }
    out
}

/// Load a GloVe-format word-vector text file: one `token v1 v2 ...` line
/// per word. All vectors must share one dimension.
pub fn load_word_vectors(path: impl AsRef<Path>) -> Result<HashMap<String, Vec<f32>>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut vectors = HashMap::new();
    let mut dim: Option<usize> = None;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let token = match parts.next() {
            Some(t) => t.to_string(),
            None => continue,
        };
        let values: std::result::Result<Vec<f32>, _> = parts.map(str::parse::<f32>).collect();
        let values = values.map_err(|_| {
            CiteBenchError::FeatureError(format!(
                "malformed word-vector line {} in {}",
                lineno + 1,
                path.as_ref().display()
            ))
        })?;
        match dim {
            None => dim = Some(values.len()),
            Some(d) if d != values.len() => {
                return Err(CiteBenchError::FeatureError(format!(
                    "word vector for {:?} has dimension {} (expected {})",
                    token,
                    values.len(),
                    d
                )));
            }
            _ => {}
        }
        vectors.insert(token, values);
    }
    Ok(vectors)
}

impl TextTransformer for WordEmbedding {
    fn fit_transform(&mut self, texts: &[String]) -> Result<Array2<f32>> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();
        match self.source.clone() {
            VectorSource::Train => self.fit_trained(&docs),
            VectorSource::Pretrained(path) => self.fit_pretrained(&docs, &path),
        }
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &'static str {
        "W2V"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus() -> Vec<String> {
        vec![
            "graph embedding graph embedding graph".to_string(),
            "graph embedding networks".to_string(),
            "text mining corpus text mining".to_string(),
            "text corpus mining documents".to_string(),
        ]
    }

    #[test]
    fn test_trained_shape() {
        let mut emb = WordEmbedding::trained(16);
        emb.config.skipgram.epochs = 3;
        emb.config.min_count = 1;
        let m = emb.fit_transform(&corpus()).unwrap();
        assert_eq!(m.dim(), (4, 16));
        assert_eq!(emb.dim(), 16);
        assert!(m.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_min_count_can_empty_vocab() {
        let mut emb = WordEmbedding::trained(8);
        emb.config.min_count = 100;
        assert!(emb.fit_transform(&corpus()).is_err());
    }

    #[test]
    fn test_pretrained_mean_pooling() {
        let dir = std::env::temp_dir().join("citebench_vectors_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vec.txt");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "graph 1.0 0.0").unwrap();
        writeln!(f, "text 0.0 1.0").unwrap();

        let mut emb = WordEmbedding::pretrained(&path);
        let texts = vec!["graph text".to_string(), "unknownword".to_string()];
        let m = emb.fit_transform(&texts).unwrap();

        assert_eq!(m.dim(), (2, 2));
        assert!((m[[0, 0]] - 0.5).abs() < 1e-6);
        assert!((m[[0, 1]] - 0.5).abs() < 1e-6);
        // No known tokens: zero vector
        assert_eq!(m[[1, 0]], 0.0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_inconsistent_vector_file_rejected() {
        let dir = std::env::temp_dir().join("citebench_vectors_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vec.txt");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "graph 1.0 0.0").unwrap();
        writeln!(f, "text 0.0").unwrap();

        assert!(load_word_vectors(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
