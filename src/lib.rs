//! # citebench: representation learning benchmarks on citation networks
//!
//! This library is an experiment harness for comparing graph and text
//! representation-learning methods (node embeddings, text embeddings, and
//! their combinations) on citation-network datasets, evaluated through
//! downstream node classification.
//!
//! ## Features
//!
//! - **Datasets**: Cora-style citation datasets with per-node text and labels
//! - **Text features**: bag-of-words, TF-IDF, vocabulary indexing, word vectors
//! - **Graph embeddings**: DeepWalk, node2vec, HOPE, TADW
//! - **Neural models**: a two-layer graph convolutional network over ndarray
//! - **Evaluation**: stratified splits, repeated trials, accuracy/F1 summaries

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Citation graph data structures
pub mod graph;

/// Citation-network datasets and loaders
pub mod datasets;

/// Text preprocessing and feature transformers
pub mod text;

/// Node embedding methods
pub mod embedding;

/// Neural network models and training
pub mod nn;

/// Splitting, metrics, and downstream evaluation
pub mod eval;

/// Experiment matrix driver
pub mod experiments;

/// Utility functions and helpers
pub mod utils;

// Re-export commonly used types
pub use datasets::CitationDataset;
pub use graph::{CitationGraph, EdgeIndex};
pub use nn::{train_gcn, TrainGcnConfig};

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum CiteBenchError {
    /// Malformed or inconsistent dataset
    #[error("Dataset error: {0}")]
    DatasetError(String),

    /// Feature construction error
    #[error("Feature error: {0}")]
    FeatureError(String),

    /// Model construction or training error
    #[error("Model error: {0}")]
    ModelError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, CiteBenchError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        datasets::CitationDataset,
        embedding::{DeepWalk, GraphEmbedding, Hope, Node2Vec, Tadw},
        eval::{Metric, Task, TaskConfig},
        experiments::ExperimentRunner,
        graph::{CitationGraph, EdgeIndex},
        nn::{train_gcn, TrainGcnConfig},
        text::{BagOfWords, TextTransformer, Tfidf, VocabIndex, WordEmbedding},
        CiteBenchError, Result,
    };
}
