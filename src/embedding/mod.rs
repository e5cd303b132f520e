//! Node embedding methods
//!
//! All methods produce a dense `(num_nodes, dim)` matrix from the citation
//! graph; TADW additionally consumes text features.

mod deepwalk;
mod hope;
mod linalg;
mod skipgram;
mod tadw;
mod walks;

pub use deepwalk::{DeepWalk, Node2Vec};
pub use hope::{Hope, HopeConfig};
pub use linalg::truncated_svd;
pub use skipgram::{SkipGram, SkipGramConfig};
pub use tadw::{Tadw, TadwConfig};
pub use walks::{generate_walks, WalkConfig};

use ndarray::Array2;

use crate::graph::CitationGraph;
use crate::Result;

/// A graph embedding method: fit once on the full graph, producing one
/// fixed-length vector per node.
pub trait GraphEmbedding {
    /// Fit on the graph. `features` carries node text features for methods
    /// that use them (TADW); the rest ignore it.
    fn fit(
        &mut self,
        graph: &CitationGraph,
        features: Option<&Array2<f32>>,
    ) -> Result<Array2<f32>>;

    /// Output dimensionality
    fn dim(&self) -> usize;

    /// Human-readable method name for experiment labels
    fn name(&self) -> &'static str;
}
