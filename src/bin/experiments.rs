//! Experiment matrix entry point.
//!
//! Experiment configuration is edited here in source, like the candidate
//! lists it replaces: pick datasets, test ratios, and candidate tasks, then
//! `cargo run --release --bin experiments`.

use citebench::datasets::{self, synthetic, SyntheticConfig};
use citebench::embedding::{DeepWalk, Hope, Node2Vec, Tadw};
use citebench::eval::{Metric, Task, TaskConfig};
use citebench::experiments::{ExperimentRunner, TaskBuilder};
use citebench::text::{BagOfWords, Tfidf, WordEmbedding};
use citebench::utils::save_json;
use citebench::CitationDataset;

fn task_config() -> TaskConfig {
    TaskConfig {
        test_ratios: vec![0.5, 0.7, 0.9, 0.95],
        n_trials: 5,
        seed: 1,
        concat: false,
        metric: Metric::MacroF1,
        classifier: Default::default(),
    }
}

fn load_datasets() -> Vec<CitationDataset> {
    let mut loaded = Vec::new();
    let loaders: [fn(&str) -> citebench::Result<CitationDataset>; 3] = [
        |d: &str| datasets::cora(d),
        |d: &str| datasets::citeseer_m10(d),
        |d: &str| datasets::dblp(d),
    ];
    for load in loaders {
        match load("data") {
            Ok(ds) => loaded.push(ds),
            Err(e) => println!("dataset skipped: {}", e),
        }
    }
    if loaded.is_empty() {
        println!("no datasets under data/, falling back to the synthetic network");
        loaded.push(
            synthetic(&SyntheticConfig::default()).expect("synthetic dataset construction"),
        );
    }
    loaded
}

fn candidates() -> Vec<(String, TaskBuilder)> {
    let cfg = task_config;
    vec![
        (
            "BOW".to_string(),
            Box::new(move || Task::new(Some(Box::new(BagOfWords::new())), None, cfg())) as TaskBuilder,
        ),
        (
            "TFIDF".to_string(),
            Box::new(move || Task::new(Some(Box::new(Tfidf::new())), None, cfg())),
        ),
        (
            "W2V (d=64)".to_string(),
            Box::new(move || Task::new(Some(Box::new(WordEmbedding::trained(64))), None, cfg())),
        ),
        (
            "DeepWalk (d=100)".to_string(),
            Box::new(move || Task::new(None, Some(Box::new(DeepWalk::new(100))), cfg())),
        ),
        (
            "Node2Vec (d=100)".to_string(),
            Box::new(move || Task::new(None, Some(Box::new(Node2Vec::new(100, 0.5, 2.0))), cfg())),
        ),
        (
            "Hope (d=100)".to_string(),
            Box::new(move || Task::new(None, Some(Box::new(Hope::new(100))), cfg())),
        ),
        (
            "BOW:DeepWalk".to_string(),
            Box::new(move || {
                Task::new(
                    Some(Box::new(BagOfWords::new())),
                    Some(Box::new(DeepWalk::new(100))),
                    TaskConfig {
                        concat: true,
                        ..cfg()
                    },
                )
            }),
        ),
        (
            "TADW - TFIDF".to_string(),
            Box::new(move || {
                Task::new(
                    Some(Box::new(Tfidf::new())),
                    Some(Box::new(Tadw::new(160))),
                    cfg(),
                )
            }),
        ),
        // ("TADW - BOW", Task::new(Some(Box::new(BagOfWords::new())), Some(Box::new(Tadw::new(160))), cfg())),
        // ("TADW - W2V", Task::new(Some(Box::new(WordEmbedding::trained(64))), Some(Box::new(Tadw::new(160))), cfg())),
        // ("W2V pretrained (d=100)", Task::new(Some(Box::new(WordEmbedding::pretrained("data/glove.txt"))), None, cfg())),
    ]
}

fn main() {
    let datasets = load_datasets();
    let candidates = candidates();

    let mut runner = ExperimentRunner::new();
    runner.run(&datasets, &candidates);

    println!();
    runner.summary();

    if let Err(e) = save_json(&runner.results, "results.json") {
        println!("could not write results.json: {}", e);
    }
}
