//! Citation graph structures shared by embeddings and neural models

mod graph_data;

pub use graph_data::{CitationGraph, EdgeIndex};
