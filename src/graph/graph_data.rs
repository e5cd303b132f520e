//! Graph data structures for citation networks

use ndarray::{Array1, Array2};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

/// Edge index representation for sparse connectivity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeIndex {
    /// Source nodes for each edge
    pub src: Vec<usize>,
    /// Destination nodes for each edge
    pub dst: Vec<usize>,
}

impl EdgeIndex {
    /// Create from edge list
    pub fn from_edges(edges: Vec<(usize, usize)>) -> Self {
        let (src, dst): (Vec<_>, Vec<_>) = edges.into_iter().unzip();
        EdgeIndex { src, dst }
    }

    /// Get number of edges
    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    /// Iterate over edges as pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }
}

/// An undirected citation graph with nodes indexed `0..num_nodes`.
///
/// Citation direction carries no information for the methods in this crate,
/// so edges are stored undirected. The petgraph store is the single source of
/// truth; matrix views are derived on demand.
#[derive(Clone, Debug)]
pub struct CitationGraph {
    graph: UnGraph<(), ()>,
}

impl CitationGraph {
    /// Build a graph over `num_nodes` nodes from an edge list.
    ///
    /// Self-loops and duplicate edges are dropped; endpoints must be within
    /// `0..num_nodes`.
    pub fn from_edges(num_nodes: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = UnGraph::<(), ()>::with_capacity(num_nodes, edges.len());
        for _ in 0..num_nodes {
            graph.add_node(());
        }
        for &(s, d) in edges {
            if s == d || s >= num_nodes || d >= num_nodes {
                continue;
            }
            let (a, b) = (NodeIndex::new(s), NodeIndex::new(d));
            if graph.find_edge(a, b).is_none() {
                graph.add_edge(a, b, ());
            }
        }
        CitationGraph { graph }
    }

    /// Build from an [`EdgeIndex`]
    pub fn from_edge_index(num_nodes: usize, edge_index: &EdgeIndex) -> Self {
        let edges: Vec<(usize, usize)> = edge_index.iter().collect();
        Self::from_edges(num_nodes, &edges)
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Neighbors of a node
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        self.graph
            .neighbors(NodeIndex::new(node))
            .map(|ix| ix.index())
            .collect()
    }

    /// Adjacency list for all nodes
    pub fn adjacency_list(&self) -> Vec<Vec<usize>> {
        (0..self.num_nodes()).map(|i| self.neighbors(i)).collect()
    }

    /// Dense symmetric adjacency matrix
    pub fn adjacency_matrix(&self) -> Array2<f32> {
        let n = self.num_nodes();
        let mut adj = Array2::zeros((n, n));
        for edge in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                adj[[a.index(), b.index()]] = 1.0;
                adj[[b.index(), a.index()]] = 1.0;
            }
        }
        adj
    }

    /// Node degrees
    pub fn degrees(&self) -> Array1<f32> {
        let mut degrees = Array1::zeros(self.num_nodes());
        for i in 0..self.num_nodes() {
            degrees[i] = self.graph.neighbors(NodeIndex::new(i)).count() as f32;
        }
        degrees
    }

    /// Row-normalized adjacency `D^-1 A` (rows of isolated nodes stay zero)
    pub fn row_normalized_adjacency(&self) -> Array2<f32> {
        let mut adj = self.adjacency_matrix();
        for mut row in adj.rows_mut() {
            let s: f32 = row.sum();
            if s > 0.0 {
                row.mapv_inplace(|x| x / s);
            }
        }
        adj
    }

    /// Symmetric GCN normalization `D^-1/2 (A + I) D^-1/2`.
    ///
    /// Degrees include the added self-loop; `d^-1/2` terms for zero degrees
    /// are forced to zero.
    pub fn gcn_normalized_adjacency(&self) -> Array2<f32> {
        let n = self.num_nodes();
        let mut adj = self.adjacency_matrix();
        for i in 0..n {
            adj[[i, i]] += 1.0;
        }

        let degrees = adj.sum_axis(ndarray::Axis(1));
        let inv_sqrt: Array1<f32> = degrees.mapv(|d| {
            let v = d.powf(-0.5);
            if v.is_finite() {
                v
            } else {
                0.0
            }
        });

        for i in 0..n {
            for j in 0..n {
                adj[[i, j]] *= inv_sqrt[i] * inv_sqrt[j];
            }
        }
        adj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> CitationGraph {
        CitationGraph::from_edges(3, &[(0, 1), (1, 2)])
    }

    #[test]
    fn test_edge_index() {
        let ei = EdgeIndex::from_edges(vec![(0, 1), (1, 2), (0, 2)]);
        assert_eq!(ei.num_edges(), 3);
        assert_eq!(ei.iter().next(), Some((0, 1)));
    }

    #[test]
    fn test_graph_construction() {
        // Duplicate and self-loop edges are dropped
        let g = CitationGraph::from_edges(3, &[(0, 1), (1, 0), (2, 2), (1, 2)]);
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.degrees()[1], 2.0);
    }

    #[test]
    fn test_adjacency_matrix_symmetry() {
        let adj = path_graph().adjacency_matrix();
        assert_eq!(adj[[0, 1]], 1.0);
        assert_eq!(adj[[1, 0]], 1.0);
        assert_eq!(adj[[0, 2]], 0.0);
    }

    #[test]
    fn test_row_normalization() {
        let adj = path_graph().row_normalized_adjacency();
        assert!((adj.row(1).sum() - 1.0).abs() < 1e-6);
        assert!((adj[[1, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gcn_normalization() {
        let g = CitationGraph::from_edges(4, &[(0, 1), (1, 2)]);
        let a_hat = g.gcn_normalized_adjacency();

        // Symmetric, finite, and isolated node 3 keeps only its self-loop
        for i in 0..4 {
            for j in 0..4 {
                assert!((a_hat[[i, j]] - a_hat[[j, i]]).abs() < 1e-6);
                assert!(a_hat[[i, j]].is_finite());
            }
        }
        assert!((a_hat[[3, 3]] - 1.0).abs() < 1e-6);
        assert_eq!(a_hat[[3, 0]], 0.0);
    }
}
