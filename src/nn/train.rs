//! GCN training on a citation dataset

use serde::{Deserialize, Serialize};

use crate::datasets::CitationDataset;
use crate::eval::metrics::f1_micro;
use crate::eval::split::stratified_masks;
use crate::{CiteBenchError, Result};

use super::adam::Adam;
use super::gcn::{argmax_rows, masked_cross_entropy, Gcn, GcnConfig};

/// Hyper-parameters for a GCN training run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainGcnConfig {
    /// Fraction of labeled nodes held out for testing
    pub test_ratio: f64,
    /// Fraction of the remaining development nodes held out for validation
    pub val_ratio: f64,
    /// Seed for splitting, weight init, and dropout
    pub seed: u64,
    /// Hidden layer width
    pub n_hidden: usize,
    /// Training epochs
    pub n_epochs: usize,
    /// Adam learning rate
    pub lr: f32,
    /// l2 weight decay
    pub weight_decay: f32,
    /// Dropout probability
    pub dropout: f32,
    /// Print a line per epoch
    pub verbose: bool,
}

impl Default for TrainGcnConfig {
    fn default() -> Self {
        TrainGcnConfig {
            test_ratio: 0.5,
            val_ratio: 0.2,
            seed: 1,
            n_hidden: 16,
            n_epochs: 200,
            lr: 1e-2,
            weight_decay: 5e-4,
            dropout: 0.5,
            verbose: true,
        }
    }
}

/// Outcome of a training run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GcnMetrics {
    /// Training loss per epoch
    pub train_loss: Vec<f32>,
    /// Validation micro-F1 per epoch
    pub val_f1: Vec<f64>,
    /// Best validation micro-F1 seen
    pub best_val_f1: f64,
    /// Epoch of the best validation score
    pub best_epoch: usize,
    /// Micro-F1 on the held-out test mask after the last epoch
    pub test_f1: f64,
}

fn masked_f1(
    logits: &ndarray::Array2<f32>,
    labels: &[usize],
    mask: &[bool],
    n_classes: usize,
) -> f64 {
    let preds = argmax_rows(&logits.view());
    let (p, t): (Vec<usize>, Vec<usize>) = preds
        .iter()
        .zip(labels)
        .zip(mask)
        .filter(|&(_, &m)| m)
        .map(|((&p, &t), _)| (p, t))
        .unzip();
    f1_micro(&p, &t, n_classes)
}

/// Train a two-layer GCN on the dataset's installed text features and report
/// per-epoch validation micro-F1 plus the final test micro-F1.
///
/// [`CitationDataset::transform_features`] must have been called first.
pub fn train_gcn(dataset: &CitationDataset, config: &TrainGcnConfig) -> Result<GcnMetrics> {
    let features = dataset.features().ok_or_else(|| {
        CiteBenchError::FeatureError(
            "dataset has no features; call transform_features first".to_string(),
        )
    })?;

    let masks = stratified_masks(
        dataset.num_nodes(),
        &dataset.main_ids,
        &dataset.main_labels,
        config.test_ratio,
        config.val_ratio,
        config.seed,
    )?;

    let a_hat = dataset.graph.gcn_normalized_adjacency();
    // Extra output class for unlabeled nodes
    let n_classes = dataset.n_classes + 1;

    let gcn_config = GcnConfig {
        in_dim: features.ncols(),
        n_hidden: config.n_hidden,
        n_classes,
        dropout: config.dropout,
        seed: config.seed,
    };
    let mut model = Gcn::new(&gcn_config)?;
    let mut opt = Adam::new(config.lr, config.weight_decay, &model.shapes());

    let mut metrics = GcnMetrics {
        best_val_f1: f64::NEG_INFINITY,
        ..Default::default()
    };

    for epoch in 0..config.n_epochs {
        let (logits, cache) = model.forward_train(&a_hat, features);
        let (loss, grad) = masked_cross_entropy(&logits, &dataset.labels, &masks.train)?;
        let (g0, g1) = model.backward(&a_hat, &cache, &grad);
        opt.step(&mut model.params(), &[g0, g1]);

        let eval_logits = model.forward(&a_hat, features);
        let val_f1 = masked_f1(&eval_logits, &dataset.labels, &masks.val, n_classes);

        metrics.train_loss.push(loss);
        metrics.val_f1.push(val_f1);
        if val_f1 > metrics.best_val_f1 {
            metrics.best_val_f1 = val_f1;
            metrics.best_epoch = epoch;
        }

        if config.verbose {
            println!(
                "Epoch {:05} | Loss {:.4} | Val F1 {:.4}",
                epoch, loss, val_f1
            );
        }
    }

    let eval_logits = model.forward(&a_hat, features);
    metrics.test_f1 = masked_f1(&eval_logits, &dataset.labels, &masks.test, n_classes);

    if config.verbose {
        println!();
        println!("Test F1 {:.2}", metrics.test_f1);
    }

    Ok(metrics)
}
