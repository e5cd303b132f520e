//! Downstream softmax classifier
//!
//! Multinomial logistic regression trained full-batch with Adam; the thin
//! scoring head applied on top of every representation under comparison.

use ndarray::{Array1, Array2};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::nn::Adam;
use crate::{CiteBenchError, Result};

/// Softmax classifier hyper-parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SoftmaxConfig {
    /// Adam learning rate
    pub lr: f32,
    /// Full-batch epochs
    pub epochs: usize,
    /// l2 weight decay
    pub weight_decay: f32,
    /// Seed for weight initialization
    pub seed: u64,
}

impl Default for SoftmaxConfig {
    fn default() -> Self {
        SoftmaxConfig {
            lr: 0.1,
            epochs: 200,
            weight_decay: 1e-4,
            seed: 42,
        }
    }
}

/// Multinomial logistic regression
pub struct SoftmaxClassifier {
    config: SoftmaxConfig,
    weights: Array2<f32>,
    bias: Array2<f32>,
    n_classes: usize,
}

impl SoftmaxClassifier {
    /// Create an unfitted classifier
    pub fn new(config: SoftmaxConfig) -> Self {
        SoftmaxClassifier {
            config,
            weights: Array2::zeros((0, 0)),
            bias: Array2::zeros((0, 0)),
            n_classes: 0,
        }
    }

    fn logits(&self, x: &Array2<f32>) -> Array2<f32> {
        let mut logits = x.dot(&self.weights);
        for mut row in logits.rows_mut() {
            row += &self.bias.row(0);
        }
        logits
    }

    /// Fit on feature rows `x` and labels `y` in `0..n_classes`.
    pub fn fit(&mut self, x: &Array2<f32>, y: &[usize], n_classes: usize) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(CiteBenchError::ModelError(format!(
                "classifier: {} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 || n_classes == 0 {
            return Err(CiteBenchError::ModelError(
                "classifier needs at least one sample and one class".to_string(),
            ));
        }
        if let Some(&bad) = y.iter().find(|&&l| l >= n_classes) {
            return Err(CiteBenchError::ModelError(format!(
                "label {} out of range for {} classes",
                bad, n_classes
            )));
        }

        let d = x.ncols();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let scale = (1.0 / d.max(1) as f32).sqrt();
        self.weights = Array2::from_shape_fn((d, n_classes), |_| rng.gen_range(-scale..scale));
        self.bias = Array2::zeros((1, n_classes));
        self.n_classes = n_classes;

        let n = x.nrows() as f32;
        let mut opt = Adam::new(
            self.config.lr,
            self.config.weight_decay,
            &[self.weights.dim(), self.bias.dim()],
        );

        for _ in 0..self.config.epochs {
            let logits = self.logits(x);
            // Softmax gradient: (p - onehot) / n
            let mut delta = logits;
            for (i, mut row) in delta.rows_mut().into_iter().enumerate() {
                let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                row.mapv_inplace(|v| (v - max).exp());
                let sum: f32 = row.sum();
                row.mapv_inplace(|v| v / sum);
                row[y[i]] -= 1.0;
                row.mapv_inplace(|v| v / n);
            }

            let grad_w = x.t().dot(&delta);
            let grad_b = delta.sum_axis(ndarray::Axis(0)).insert_axis(ndarray::Axis(0));

            let mut params = [&mut self.weights, &mut self.bias];
            opt.step(&mut params, &[grad_w, grad_b]);
        }
        Ok(())
    }

    /// Predict class labels for feature rows.
    pub fn predict(&self, x: &Array2<f32>) -> Result<Vec<usize>> {
        if self.n_classes == 0 {
            return Err(CiteBenchError::ModelError(
                "classifier is not fitted".to_string(),
            ));
        }
        if x.ncols() != self.weights.nrows() {
            return Err(CiteBenchError::ModelError(format!(
                "classifier expects {} features, got {}",
                self.weights.nrows(),
                x.ncols()
            )));
        }
        let logits = self.logits(x);
        Ok(logits
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            })
            .collect())
    }

    /// Per-class probabilities for feature rows.
    pub fn predict_proba(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        if self.n_classes == 0 {
            return Err(CiteBenchError::ModelError(
                "classifier is not fitted".to_string(),
            ));
        }
        let mut probs = self.logits(x);
        for mut row in probs.rows_mut() {
            let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            row.mapv_inplace(|v| (v - max).exp());
            let sum: f32 = row.sum();
            row.mapv_inplace(|v| v / sum);
        }
        Ok(probs)
    }

    /// Class-count of the fitted model
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Row-wise l2 feature normalization helper shared by task pipelines.
pub fn l2_normalize_rows(x: &mut Array2<f32>) {
    for mut row in x.rows_mut() {
        let norm: f32 = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
}

/// Column-wise standardization to zero mean and unit variance.
pub fn standardize_columns(x: &mut Array2<f32>) {
    let n = x.nrows() as f32;
    if n == 0.0 {
        return;
    }
    let means: Array1<f32> = x.sum_axis(ndarray::Axis(0)) / n;
    for j in 0..x.ncols() {
        let mut var = 0.0f32;
        for i in 0..x.nrows() {
            let d = x[[i, j]] - means[j];
            var += d * d;
        }
        let sd = (var / n).sqrt();
        for i in 0..x.nrows() {
            x[[i, j]] = if sd > 1e-8 {
                (x[[i, j]] - means[j]) / sd
            } else {
                0.0
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f32>, Vec<usize>) {
        let x = array![
            [2.0f32, 0.1],
            [1.8, -0.2],
            [2.2, 0.0],
            [-2.0, 0.2],
            [-1.9, -0.1],
            [-2.1, 0.1]
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = separable();
        let mut clf = SoftmaxClassifier::new(SoftmaxConfig::default());
        clf.fit(&x, &y, 2).unwrap();
        assert_eq!(clf.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = separable();
        let mut clf = SoftmaxClassifier::new(SoftmaxConfig::default());
        clf.fit(&x, &y, 2).unwrap();
        let probs = clf.predict_proba(&x).unwrap();
        for row in probs.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unfitted_predict_rejected() {
        let clf = SoftmaxClassifier::new(SoftmaxConfig::default());
        assert!(clf.predict(&Array2::zeros((2, 2))).is_err());
    }

    #[test]
    fn test_label_out_of_range_rejected() {
        let (x, _) = separable();
        let mut clf = SoftmaxClassifier::new(SoftmaxConfig::default());
        assert!(clf.fit(&x, &[0, 0, 0, 1, 1, 5], 2).is_err());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let (x, y) = separable();
        let mut clf = SoftmaxClassifier::new(SoftmaxConfig::default());
        clf.fit(&x, &y, 2).unwrap();
        assert!(clf.predict(&Array2::zeros((2, 5))).is_err());
    }

    #[test]
    fn test_standardize_columns() {
        let mut x = array![[1.0f32, 10.0], [3.0, 10.0]];
        standardize_columns(&mut x);
        // First column standardized, constant column zeroed
        assert!((x[[0, 0]] + 1.0).abs() < 1e-5);
        assert!((x[[1, 0]] - 1.0).abs() < 1e-5);
        assert_eq!(x[[0, 1]], 0.0);
    }
}
