//! Two-layer graph convolutional network over a dense normalized adjacency
//!
//! Forward: `logits = Â relu(Â X W0) W1` with inverted dropout on the input
//! and hidden activations during training. Gradients are written out
//! explicitly; `Â` is symmetric so its transpose never materializes.

use ndarray::{Array2, ArrayView2};
use rand::prelude::*;

use crate::{CiteBenchError, Result};

/// GCN hyper-parameters
#[derive(Clone, Debug)]
pub struct GcnConfig {
    /// Input feature dimension
    pub in_dim: usize,
    /// Hidden layer width
    pub n_hidden: usize,
    /// Number of output classes
    pub n_classes: usize,
    /// Dropout probability applied to input and hidden activations
    pub dropout: f32,
    /// Seed for weight init and dropout
    pub seed: u64,
}

/// Intermediate activations kept for the backward pass
pub struct GcnCache {
    ax: Array2<f32>,
    hidden: Array2<f32>,
    hidden_mask: Option<Array2<f32>>,
    a_hidden: Array2<f32>,
}

/// Two-layer GCN
pub struct Gcn {
    w0: Array2<f32>,
    w1: Array2<f32>,
    dropout: f32,
    rng: StdRng,
}

fn glorot(rng: &mut StdRng, rows: usize, cols: usize) -> Array2<f32> {
    let limit = (6.0 / (rows + cols) as f32).sqrt();
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-limit..limit))
}

impl Gcn {
    /// Create a GCN with Glorot-initialized weights.
    pub fn new(config: &GcnConfig) -> Result<Self> {
        if config.in_dim == 0 || config.n_hidden == 0 || config.n_classes == 0 {
            return Err(CiteBenchError::ModelError(
                "GCN dimensions must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&config.dropout) {
            return Err(CiteBenchError::ModelError(format!(
                "dropout {} outside [0, 1)",
                config.dropout
            )));
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        Ok(Gcn {
            w0: glorot(&mut rng, config.in_dim, config.n_hidden),
            w1: glorot(&mut rng, config.n_hidden, config.n_classes),
            dropout: config.dropout,
            rng,
        })
    }

    fn dropout_mask(&mut self, shape: (usize, usize)) -> Array2<f32> {
        let keep = 1.0 - self.dropout;
        let rng = &mut self.rng;
        Array2::from_shape_fn(shape, |_| {
            if rng.gen::<f32>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        })
    }

    /// Inference forward pass (no dropout).
    pub fn forward(&self, a_hat: &Array2<f32>, x: &Array2<f32>) -> Array2<f32> {
        let hidden = a_hat.dot(x).dot(&self.w0).mapv(|v| v.max(0.0));
        a_hat.dot(&hidden).dot(&self.w1)
    }

    /// Training forward pass with dropout; returns logits and the cache
    /// needed by [`Self::backward`].
    pub fn forward_train(
        &mut self,
        a_hat: &Array2<f32>,
        x: &Array2<f32>,
    ) -> (Array2<f32>, GcnCache) {
        let x = if self.dropout > 0.0 {
            x * &self.dropout_mask(x.dim())
        } else {
            x.clone()
        };

        let ax = a_hat.dot(&x);
        let hidden = ax.dot(&self.w0).mapv(|v| v.max(0.0));

        let (hidden_dropped, hidden_mask) = if self.dropout > 0.0 {
            let mask = self.dropout_mask(hidden.dim());
            (&hidden * &mask, Some(mask))
        } else {
            (hidden.clone(), None)
        };

        let a_hidden = a_hat.dot(&hidden_dropped);
        let logits = a_hidden.dot(&self.w1);

        (
            logits,
            GcnCache {
                ax,
                hidden,
                hidden_mask,
                a_hidden,
            },
        )
    }

    /// Backward pass from the logit gradient; returns `(grad_w0, grad_w1)`.
    pub fn backward(
        &self,
        a_hat: &Array2<f32>,
        cache: &GcnCache,
        grad_logits: &Array2<f32>,
    ) -> (Array2<f32>, Array2<f32>) {
        let grad_w1 = cache.a_hidden.t().dot(grad_logits);

        // A is symmetric, so propagating through `A h` is another A product
        let grad_a_hidden = grad_logits.dot(&self.w1.t());
        let mut grad_hidden = a_hat.dot(&grad_a_hidden);
        if let Some(mask) = &cache.hidden_mask {
            grad_hidden *= mask;
        }
        // ReLU gate
        ndarray::Zip::from(&mut grad_hidden)
            .and(&cache.hidden)
            .for_each(|g, &h| {
                if h <= 0.0 {
                    *g = 0.0;
                }
            });

        let grad_w0 = cache.ax.t().dot(&grad_hidden);
        (grad_w0, grad_w1)
    }

    /// Mutable access to both weight matrices, for the optimizer.
    pub fn params(&mut self) -> [&mut Array2<f32>; 2] {
        [&mut self.w0, &mut self.w1]
    }

    /// Weight shapes, aligned with [`Self::params`].
    pub fn shapes(&self) -> [(usize, usize); 2] {
        [self.w0.dim(), self.w1.dim()]
    }
}

/// Cross-entropy over masked rows of the logits.
///
/// Returns the mean loss over the masked rows and the logit gradient, which
/// is zero outside the mask.
pub fn masked_cross_entropy(
    logits: &Array2<f32>,
    labels: &[usize],
    mask: &[bool],
) -> Result<(f32, Array2<f32>)> {
    let n_masked = mask.iter().filter(|&&m| m).count();
    if n_masked == 0 {
        return Err(CiteBenchError::ModelError(
            "cross entropy over an empty mask".to_string(),
        ));
    }
    if labels.len() != logits.nrows() || mask.len() != logits.nrows() {
        return Err(CiteBenchError::ModelError(format!(
            "cross entropy shape mismatch: {} logit rows, {} labels, {} mask entries",
            logits.nrows(),
            labels.len(),
            mask.len()
        )));
    }

    let mut loss = 0.0f32;
    let mut grad = Array2::zeros(logits.dim());
    let inv = 1.0 / n_masked as f32;

    for (i, row) in logits.rows().into_iter().enumerate() {
        if !mask[i] {
            continue;
        }
        let probs = softmax_row(row);
        let label = labels[i];
        loss -= (probs[label].max(1e-12)).ln();
        for (j, &p) in probs.iter().enumerate() {
            grad[[i, j]] = (p - if j == label { 1.0 } else { 0.0 }) * inv;
        }
    }
    Ok((loss * inv, grad))
}

fn softmax_row(row: ndarray::ArrayView1<f32>) -> Vec<f32> {
    let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = row.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Argmax predictions per row.
pub fn argmax_rows(logits: &ArrayView2<f32>) -> Vec<usize> {
    logits
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
        .collect()
}
