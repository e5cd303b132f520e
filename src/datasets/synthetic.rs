//! Seeded synthetic citation networks for tests and demos

use rand::prelude::*;

use crate::graph::CitationGraph;
use crate::Result;

use super::CitationDataset;

/// Configuration for the synthetic generator
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Nodes per class
    pub nodes_per_class: usize,
    /// Number of classes
    pub n_classes: usize,
    /// Probability of an edge inside a class
    pub intra_p: f64,
    /// Probability of an edge across classes
    pub inter_p: f64,
    /// Fraction of nodes left unlabeled
    pub unlabeled_fraction: f64,
    /// Tokens drawn per document
    pub tokens_per_doc: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig {
            nodes_per_class: 20,
            n_classes: 3,
            intra_p: 0.2,
            inter_p: 0.02,
            unlabeled_fraction: 0.1,
            tokens_per_doc: 12,
            seed: 42,
        }
    }
}

// Shared vocabulary mixed into every class so texts are not trivially separable
const COMMON_TOKENS: [&str; 6] = ["method", "results", "paper", "approach", "model", "data"];

/// Generate a planted-partition citation network with class-specific token
/// pools. Deterministic under `config.seed`.
pub fn synthetic(config: &SyntheticConfig) -> Result<CitationDataset> {
    let n = config.nodes_per_class * config.n_classes;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let class_of: Vec<usize> = (0..n).map(|i| i / config.nodes_per_class).collect();

    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let p = if class_of[i] == class_of[j] {
                config.intra_p
            } else {
                config.inter_p
            };
            if rng.gen_bool(p) {
                edges.push((i, j));
            }
        }
    }
    let graph = CitationGraph::from_edges(n, &edges);

    let mut texts = Vec::with_capacity(n);
    for &c in &class_of {
        let mut tokens = Vec::with_capacity(config.tokens_per_doc);
        for _ in 0..config.tokens_per_doc {
            if rng.gen_bool(0.7) {
                // Class-specific token
                let t = rng.gen_range(0..8);
                tokens.push(format!("topic{}word{}", c, t));
            } else {
                tokens.push(COMMON_TOKENS[rng.gen_range(0..COMMON_TOKENS.len())].to_string());
            }
        }
        texts.push(tokens.join(" "));
    }

    let labels: Vec<usize> = class_of
        .iter()
        .map(|&c| {
            if rng.gen_bool(config.unlabeled_fraction) {
                config.n_classes
            } else {
                c
            }
        })
        .collect();

    let ids: Vec<String> = (0..n).map(|i| format!("paper{}", i)).collect();
    let label_names: Vec<String> = (0..config.n_classes).map(|c| format!("class{}", c)).collect();

    CitationDataset::new(
        "Synthetic",
        ids,
        graph,
        texts,
        labels,
        config.n_classes,
        label_names,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_shape() {
        let config = SyntheticConfig::default();
        let ds = synthetic(&config).unwrap();
        assert_eq!(ds.num_nodes(), 60);
        assert_eq!(ds.n_classes, 3);
        assert!(!ds.main_ids.is_empty());
        assert!(ds.main_ids.len() <= 60);
    }

    #[test]
    fn test_synthetic_deterministic() {
        let config = SyntheticConfig::default();
        let a = synthetic(&config).unwrap();
        let b = synthetic(&config).unwrap();
        assert_eq!(a.texts, b.texts);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.graph.num_edges(), b.graph.num_edges());
    }

    #[test]
    fn test_synthetic_community_structure() {
        let config = SyntheticConfig {
            nodes_per_class: 30,
            intra_p: 0.3,
            inter_p: 0.01,
            ..Default::default()
        };
        let ds = synthetic(&config).unwrap();

        let mut intra = 0usize;
        let mut inter = 0usize;
        for i in 0..ds.num_nodes() {
            for j in ds.graph.neighbors(i) {
                if i / 30 == j / 30 {
                    intra += 1;
                } else {
                    inter += 1;
                }
            }
        }
        assert!(intra > inter);
    }
}
