//! Text feature transformers
//!
//! A transformer is fit once on the full corpus and produces one fixed-length
//! vector per document; after fitting it is reused read-only.

mod embed;
mod index;
mod preprocess;
mod vectorize;

pub use embed::{WordEmbedding, WordEmbeddingConfig};
pub use index::{IndexedCorpus, VocabIndex};
pub use preprocess::tokenize;
pub use vectorize::{BagOfWords, Tfidf, VectorizerConfig};

use ndarray::Array2;

use crate::Result;

/// A stateful text feature transformer.
pub trait TextTransformer {
    /// Fit on the corpus and return one feature row per document.
    fn fit_transform(&mut self, texts: &[String]) -> Result<Array2<f32>>;

    /// Output dimensionality; only meaningful after fitting.
    fn dim(&self) -> usize;

    /// Human-readable transformer name for experiment labels.
    fn name(&self) -> &'static str;
}
