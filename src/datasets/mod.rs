//! Citation-network datasets
//!
//! A dataset bundles a fixed citation graph with per-node raw text and a
//! class label vector. It is constructed once per run and immutable
//! thereafter, except for the one-shot [`CitationDataset::transform_features`]
//! hook that installs a fitted text transformer's output as node features.

mod loader;
mod synthetic;

pub use loader::{citeseer_m10, cora, dblp, from_content_files};
pub use synthetic::{synthetic, SyntheticConfig};

use ndarray::Array2;

use crate::graph::CitationGraph;
use crate::text::TextTransformer;
use crate::{CiteBenchError, Result};

/// A citation-network dataset.
///
/// Nodes are indexed `0..num_nodes`. Nodes without a known class carry the
/// explicit unknown label `n_classes`; the labeled subset is exposed through
/// `main_ids`/`main_labels` and is what splits and classifiers operate on.
#[derive(Clone, Debug)]
pub struct CitationDataset {
    /// Dataset name used in experiment labels
    pub name: String,
    /// Original node identifiers, aligned with node indices
    pub ids: Vec<String>,
    /// The citation graph
    pub graph: CitationGraph,
    /// Raw text per node
    pub texts: Vec<String>,
    /// Class label per node; unlabeled nodes carry `n_classes`
    pub labels: Vec<usize>,
    /// Node indices of labeled nodes
    pub main_ids: Vec<usize>,
    /// Labels of the labeled nodes, aligned with `main_ids`
    pub main_labels: Vec<usize>,
    /// Number of known classes
    pub n_classes: usize,
    /// Class names, aligned with label values
    pub label_names: Vec<String>,
    features: Option<Array2<f32>>,
}

impl CitationDataset {
    /// Assemble a dataset, checking that all per-node vectors line up.
    pub fn new(
        name: impl Into<String>,
        ids: Vec<String>,
        graph: CitationGraph,
        texts: Vec<String>,
        labels: Vec<usize>,
        n_classes: usize,
        label_names: Vec<String>,
    ) -> Result<Self> {
        let n = graph.num_nodes();
        if ids.len() != n || texts.len() != n || labels.len() != n {
            return Err(CiteBenchError::DatasetError(format!(
                "inconsistent dataset: {} nodes, {} ids, {} texts, {} labels",
                n,
                ids.len(),
                texts.len(),
                labels.len()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l > n_classes) {
            return Err(CiteBenchError::DatasetError(format!(
                "label {} out of range for {} classes",
                bad, n_classes
            )));
        }

        let (main_ids, main_labels): (Vec<usize>, Vec<usize>) = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l < n_classes)
            .map(|(i, &l)| (i, l))
            .unzip();

        if main_ids.is_empty() {
            return Err(CiteBenchError::DatasetError(
                "dataset has no labeled nodes".to_string(),
            ));
        }

        Ok(CitationDataset {
            name: name.into(),
            ids,
            graph,
            texts,
            labels,
            main_ids,
            main_labels,
            n_classes,
            label_names,
            features: None,
        })
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// The label value reserved for unlabeled nodes
    pub fn unknown_label(&self) -> usize {
        self.n_classes
    }

    /// Fit a text transformer on this dataset's corpus and install the
    /// resulting matrix as node features.
    pub fn transform_features(&mut self, transformer: &mut dyn TextTransformer) -> Result<()> {
        let features = transformer.fit_transform(&self.texts)?;
        if features.nrows() != self.num_nodes() {
            return Err(CiteBenchError::FeatureError(format!(
                "transformer produced {} rows for {} nodes",
                features.nrows(),
                self.num_nodes()
            )));
        }
        self.features = Some(features);
        Ok(())
    }

    /// Node features installed by [`Self::transform_features`], if any
    pub fn features(&self) -> Option<&Array2<f32>> {
        self.features.as_ref()
    }
}
