//! Random walk generation for walk-based embeddings
//!
//! Uniform walks give DeepWalk; the p/q-biased 2nd-order variant gives
//! node2vec. Biased steps use rejection sampling, O(1) expected per step.

use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::graph::CitationGraph;

/// Configuration for random walks
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Length of each walk
    pub walk_length: usize,
    /// Number of walks started from every node
    pub num_walks: usize,
    /// Return parameter: small p favors backtracking
    pub p: f32,
    /// In-out parameter: small q favors outward exploration
    pub q: f32,
    /// Random seed
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        WalkConfig {
            walk_length: 80,
            num_walks: 10,
            p: 1.0,
            q: 1.0,
            seed: 42,
        }
    }
}

/// Generate walks from every node, `num_walks` iterations in parallel.
///
/// Walks stop early at nodes without neighbors. Deterministic for a given
/// seed: iteration `i` uses `seed + i`.
pub fn generate_walks(graph: &CitationGraph, config: &WalkConfig) -> Vec<Vec<usize>> {
    let adjacency = graph.adjacency_list();
    let unbiased =
        (config.p - 1.0).abs() < f32::EPSILON && (config.q - 1.0).abs() < f32::EPSILON;

    (0..config.num_walks)
        .into_par_iter()
        .flat_map(|iter_idx| {
            let mut rng = StdRng::seed_from_u64(config.seed + iter_idx as u64);
            let mut starts: Vec<usize> = (0..adjacency.len()).collect();
            starts.shuffle(&mut rng);

            starts
                .into_iter()
                .map(|start| {
                    if unbiased {
                        unbiased_walk(&adjacency, start, config.walk_length, &mut rng)
                    } else {
                        biased_walk(&adjacency, start, config, &mut rng)
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn unbiased_walk<R: Rng>(
    adjacency: &[Vec<usize>],
    start: usize,
    walk_length: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut walk = Vec::with_capacity(walk_length);
    walk.push(start);
    let mut curr = start;
    for _ in 1..walk_length {
        let neighbors = &adjacency[curr];
        if neighbors.is_empty() {
            break;
        }
        curr = neighbors[rng.gen_range(0..neighbors.len())];
        walk.push(curr);
    }
    walk
}

fn biased_walk<R: Rng>(
    adjacency: &[Vec<usize>],
    start: usize,
    config: &WalkConfig,
    rng: &mut R,
) -> Vec<usize> {
    let mut walk = Vec::with_capacity(config.walk_length);
    walk.push(start);

    let mut curr = start;
    let mut prev: Option<usize> = None;
    let mut prev_neighbors: HashSet<usize> = HashSet::new();

    let inv_p = 1.0 / config.p;
    let inv_q = 1.0 / config.q;
    let max_weight = inv_p.max(1.0).max(inv_q);

    for _ in 1..config.walk_length {
        let neighbors = &adjacency[curr];
        if neighbors.is_empty() {
            break;
        }

        let next = match prev {
            None => neighbors[rng.gen_range(0..neighbors.len())],
            Some(prev_node) => loop {
                let candidate = neighbors[rng.gen_range(0..neighbors.len())];
                let weight = if candidate == prev_node {
                    inv_p
                } else if prev_neighbors.contains(&candidate) {
                    1.0
                } else {
                    inv_q
                };
                if rng.gen::<f32>() < weight / max_weight {
                    break candidate;
                }
            },
        };

        prev_neighbors = adjacency[curr].iter().copied().collect();
        prev = Some(curr);
        curr = next;
        walk.push(curr);
    }
    walk
}
