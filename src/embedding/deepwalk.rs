//! DeepWalk and node2vec pipelines: random walks into skip-gram training

use ndarray::Array2;

use crate::graph::CitationGraph;
use crate::{CiteBenchError, Result};

use super::skipgram::{SkipGram, SkipGramConfig};
use super::walks::{generate_walks, WalkConfig};
use super::GraphEmbedding;

fn node_frequencies(walks: &[Vec<usize>], num_nodes: usize) -> Vec<usize> {
    let mut freqs = vec![0usize; num_nodes];
    for walk in walks {
        for &node in walk {
            freqs[node] += 1;
        }
    }
    freqs
}

fn fit_walk_embedding(
    graph: &CitationGraph,
    walk: &WalkConfig,
    skipgram: &SkipGramConfig,
) -> Result<Array2<f32>> {
    if graph.num_nodes() == 0 {
        return Err(CiteBenchError::ModelError(
            "cannot embed an empty graph".to_string(),
        ));
    }
    let walks = generate_walks(graph, walk);
    let mut model = SkipGram::new(graph.num_nodes(), skipgram.clone());
    model.build_neg_table(&node_frequencies(&walks, graph.num_nodes()));
    model.train(&walks);
    Ok(model.embeddings().clone())
}

/// DeepWalk: uniform random walks + skip-gram
#[derive(Clone, Debug)]
pub struct DeepWalk {
    /// Walk generation options (p and q are pinned to 1)
    pub walk: WalkConfig,
    /// Skip-gram options
    pub skipgram: SkipGramConfig,
}

impl DeepWalk {
    /// DeepWalk with the given embedding dimension and default walks
    pub fn new(dim: usize) -> Self {
        DeepWalk {
            walk: WalkConfig::default(),
            skipgram: SkipGramConfig {
                dim,
                ..Default::default()
            },
        }
    }
}

impl GraphEmbedding for DeepWalk {
    fn fit(
        &mut self,
        graph: &CitationGraph,
        _features: Option<&Array2<f32>>,
    ) -> Result<Array2<f32>> {
        let walk = WalkConfig {
            p: 1.0,
            q: 1.0,
            ..self.walk
        };
        fit_walk_embedding(graph, &walk, &self.skipgram)
    }

    fn dim(&self) -> usize {
        self.skipgram.dim
    }

    fn name(&self) -> &'static str {
        "DeepWalk"
    }
}

/// node2vec: p/q-biased 2nd-order walks + skip-gram
#[derive(Clone, Debug)]
pub struct Node2Vec {
    /// Walk generation options, including p and q
    pub walk: WalkConfig,
    /// Skip-gram options
    pub skipgram: SkipGramConfig,
}

impl Node2Vec {
    /// node2vec with the given embedding dimension and bias parameters
    pub fn new(dim: usize, p: f32, q: f32) -> Self {
        Node2Vec {
            walk: WalkConfig {
                p,
                q,
                ..Default::default()
            },
            skipgram: SkipGramConfig {
                dim,
                ..Default::default()
            },
        }
    }
}

impl GraphEmbedding for Node2Vec {
    fn fit(
        &mut self,
        graph: &CitationGraph,
        _features: Option<&Array2<f32>>,
    ) -> Result<Array2<f32>> {
        fit_walk_embedding(graph, &self.walk, &self.skipgram)
    }

    fn dim(&self) -> usize {
        self.skipgram.dim
    }

    fn name(&self) -> &'static str {
        "Node2Vec"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cliques() -> CitationGraph {
        let mut edges = Vec::new();
        for i in 0..5 {
            for j in (i + 1)..5 {
                edges.push((i, j));
                edges.push((i + 5, j + 5));
            }
        }
        edges.push((0, 5)); // bridge
        CitationGraph::from_edges(10, &edges)
    }

    fn small_config() -> (WalkConfig, SkipGramConfig) {
        (
            WalkConfig {
                walk_length: 20,
                num_walks: 8,
                ..Default::default()
            },
            SkipGramConfig {
                dim: 16,
                epochs: 4,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_deepwalk_shape() {
        let graph = two_cliques();
        let (walk, skipgram) = small_config();
        let mut dw = DeepWalk::new(16);
        dw.walk = walk;
        dw.skipgram = skipgram;

        let emb = dw.fit(&graph, None).unwrap();
        assert_eq!(emb.nrows(), 10);
        assert_eq!(emb.ncols(), 16);
        assert!(emb.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_deepwalk_separates_cliques() {
        let graph = two_cliques();
        let (walk, skipgram) = small_config();
        let mut dw = DeepWalk::new(16);
        dw.walk = walk;
        dw.skipgram = skipgram;
        let emb = dw.fit(&graph, None).unwrap();

        let cos = |a: usize, b: usize| {
            let (ra, rb) = (emb.row(a), emb.row(b));
            ra.dot(&rb) / (ra.dot(&ra).sqrt() * rb.dot(&rb).sqrt())
        };
        // Same-clique similarity should beat the cross-clique pair (1, 6)
        assert!(cos(1, 2) > cos(1, 6));
    }

    #[test]
    fn test_node2vec_shape() {
        let graph = two_cliques();
        let mut n2v = Node2Vec::new(8, 0.5, 2.0);
        n2v.walk.walk_length = 15;
        n2v.walk.num_walks = 4;
        n2v.skipgram.epochs = 2;

        let emb = n2v.fit(&graph, None).unwrap();
        assert_eq!(emb.dim(), (10, 8));
    }

    #[test]
    fn test_empty_graph_rejected() {
        let graph = CitationGraph::from_edges(0, &[]);
        let mut dw = DeepWalk::new(8);
        assert!(dw.fit(&graph, None).is_err());
    }
}
