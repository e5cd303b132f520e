//! Loaders for Cora-style citation datasets
//!
//! Two tab-separated files describe a dataset:
//!
//! - `<name>.content`: one line per paper, `id<TAB>label<TAB>text`. An empty
//!   label field marks an unlabeled paper.
//! - `<name>.cites`: one line per citation, `citing<TAB>cited`.
//!
//! Citations that reference papers absent from the content file are skipped.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::graph::{CitationGraph, EdgeIndex};
use crate::{CiteBenchError, Result};

use super::CitationDataset;

/// Load a dataset from a `.content`/`.cites` file pair.
pub fn from_content_files(
    name: &str,
    content_path: impl AsRef<Path>,
    cites_path: impl AsRef<Path>,
) -> Result<CitationDataset> {
    let mut ids = Vec::new();
    let mut texts = Vec::new();
    let mut raw_labels: Vec<Option<String>> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    let content = BufReader::new(File::open(content_path.as_ref())?);
    for (lineno, line) in content.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, '\t');
        let id = parts.next().unwrap_or_default().to_string();
        let label = parts.next().map(str::trim).unwrap_or_default();
        let text = parts.next().unwrap_or_default().to_string();
        if id.is_empty() {
            return Err(CiteBenchError::DatasetError(format!(
                "{}: empty paper id on line {}",
                name,
                lineno + 1
            )));
        }
        if index_of.contains_key(&id) {
            return Err(CiteBenchError::DatasetError(format!(
                "{}: duplicate paper id {:?} on line {}",
                name,
                id,
                lineno + 1
            )));
        }
        index_of.insert(id.clone(), ids.len());
        ids.push(id);
        texts.push(text);
        raw_labels.push(if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        });
    }

    if ids.is_empty() {
        return Err(CiteBenchError::DatasetError(format!(
            "{}: content file is empty",
            name
        )));
    }

    // Stable label vocabulary: sorted class names
    let mut label_names: Vec<String> = raw_labels.iter().flatten().cloned().collect();
    label_names.sort();
    label_names.dedup();
    let n_classes = label_names.len();
    let label_id: HashMap<&str, usize> = label_names
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let labels: Vec<usize> = raw_labels
        .iter()
        .map(|l| match l {
            Some(l) => label_id[l.as_str()],
            None => n_classes,
        })
        .collect();

    let mut edges = Vec::new();
    let cites = BufReader::new(File::open(cites_path.as_ref())?);
    for line in cites.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split('\t');
        let citing = parts.next().map(str::trim).unwrap_or_default();
        let cited = parts.next().map(str::trim).unwrap_or_default();
        if let (Some(&s), Some(&d)) = (index_of.get(citing), index_of.get(cited)) {
            edges.push((s, d));
        }
    }

    let edge_index = EdgeIndex::from_edges(edges);
    let graph = CitationGraph::from_edge_index(ids.len(), &edge_index);
    CitationDataset::new(name, ids, graph, texts, labels, n_classes, label_names)
}

/// Load the Cora dataset from a directory holding `cora.content`/`cora.cites`.
pub fn cora(dir: impl AsRef<Path>) -> Result<CitationDataset> {
    let dir = dir.as_ref();
    from_content_files("Cora", dir.join("cora.content"), dir.join("cora.cites"))
}

/// Load CiteseerM10 from `citeseer_m10.content`/`citeseer_m10.cites`.
pub fn citeseer_m10(dir: impl AsRef<Path>) -> Result<CitationDataset> {
    let dir = dir.as_ref();
    from_content_files(
        "CiteseerM10",
        dir.join("citeseer_m10.content"),
        dir.join("citeseer_m10.cites"),
    )
}

/// Load DBLP from `dblp.content`/`dblp.cites`.
pub fn dblp(dir: impl AsRef<Path>) -> Result<CitationDataset> {
    let dir = dir.as_ref();
    from_content_files("DBLP", dir.join("dblp.content"), dir.join("dblp.cites"))
}
