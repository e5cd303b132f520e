//! HOPE: high-order proximity preserved embeddings
//!
//! Builds a Katz proximity matrix from a truncated power series and factors
//! it with truncated SVD; the embedding concatenates the scaled left and
//! right factors, preserving asymmetric proximity roles.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::graph::CitationGraph;
use crate::{CiteBenchError, Result};

use super::linalg::truncated_svd;
use super::GraphEmbedding;

/// HOPE configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HopeConfig {
    /// Total embedding dimension; must be even (split across both factors)
    pub dim: usize,
    /// Katz decay factor; must stay below the spectral radius inverse for
    /// the series to make sense
    pub beta: f32,
    /// Number of terms of the Katz series
    pub series_terms: usize,
    /// Orthogonal-iteration sweeps inside the SVD
    pub svd_iters: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for HopeConfig {
    fn default() -> Self {
        HopeConfig {
            dim: 100,
            beta: 0.05,
            series_terms: 5,
            svd_iters: 30,
            seed: 42,
        }
    }
}

/// HOPE embedding method
#[derive(Clone, Debug)]
pub struct Hope {
    /// Configuration
    pub config: HopeConfig,
}

impl Hope {
    /// HOPE with the given total dimension and default Katz settings
    pub fn new(dim: usize) -> Self {
        Hope {
            config: HopeConfig {
                dim,
                ..Default::default()
            },
        }
    }

    /// Truncated Katz proximity: `sum_{t=1..T} (beta A)^t`
    fn katz_proximity(&self, graph: &CitationGraph) -> Array2<f32> {
        let p = graph.adjacency_matrix() * self.config.beta;
        let mut term = p.clone();
        let mut katz = p.clone();
        for _ in 1..self.config.series_terms {
            term = term.dot(&p);
            katz += &term;
        }
        katz
    }
}

impl GraphEmbedding for Hope {
    fn fit(
        &mut self,
        graph: &CitationGraph,
        _features: Option<&Array2<f32>>,
    ) -> Result<Array2<f32>> {
        let n = graph.num_nodes();
        if self.config.dim % 2 != 0 {
            return Err(CiteBenchError::ModelError(format!(
                "HOPE dimension {} must be even",
                self.config.dim
            )));
        }
        let half = self.config.dim / 2;
        if half > n {
            return Err(CiteBenchError::ModelError(format!(
                "HOPE dimension {} too large for {} nodes",
                self.config.dim, n
            )));
        }

        let katz = self.katz_proximity(graph);
        let (u, sigma, v) = truncated_svd(&katz, half, self.config.svd_iters, self.config.seed)?;

        let mut emb = Array2::zeros((n, self.config.dim));
        for j in 0..half {
            let s = sigma[j].max(0.0).sqrt();
            for i in 0..n {
                emb[[i, j]] = u[[i, j]] * s;
                emb[[i, half + j]] = v[[i, j]] * s;
            }
        }
        Ok(emb)
    }

    fn dim(&self) -> usize {
        self.config.dim
    }

    fn name(&self) -> &'static str {
        "Hope"
    }
}
