//! Adam optimizer over ndarray parameter matrices

use ndarray::Array2;

/// Adam with l2 weight decay folded into the gradient.
///
/// Holds first/second moment estimates per parameter matrix; parameter order
/// must stay fixed across steps.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    weight_decay: f32,
    t: i32,
    m: Vec<Array2<f32>>,
    v: Vec<Array2<f32>>,
}

impl Adam {
    /// Create an optimizer for parameters of the given shapes.
    pub fn new(lr: f32, weight_decay: f32, shapes: &[(usize, usize)]) -> Self {
        Adam {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay,
            t: 0,
            m: shapes.iter().map(|&s| Array2::zeros(s)).collect(),
            v: shapes.iter().map(|&s| Array2::zeros(s)).collect(),
        }
    }

    /// Apply one update; `params` and `grads` are aligned with the shapes
    /// passed at construction.
    pub fn step(&mut self, params: &mut [&mut Array2<f32>], grads: &[Array2<f32>]) {
        assert_eq!(params.len(), self.m.len());
        assert_eq!(grads.len(), self.m.len());
        self.t += 1;

        let bias1 = 1.0 - self.beta1.powi(self.t);
        let bias2 = 1.0 - self.beta2.powi(self.t);

        for i in 0..self.m.len() {
            let g = &grads[i] + &(&*params[i] * self.weight_decay);
            self.m[i] = &self.m[i] * self.beta1 + &g * (1.0 - self.beta1);
            self.v[i] = &self.v[i] * self.beta2 + &g.mapv(|x| x * x) * (1.0 - self.beta2);

            let lr = self.lr;
            let eps = self.eps;
            ndarray::Zip::from(&mut *params[i])
                .and(&self.m[i])
                .and(&self.v[i])
                .for_each(|p, &m, &v| {
                    let m_hat = m / bias1;
                    let v_hat = v / bias2;
                    *p -= lr * m_hat / (v_hat.sqrt() + eps);
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_adam_minimizes_quadratic() {
        // Minimize ||w||^2; gradient is 2w
        let mut w = array![[1.0f32, -2.0], [3.0, 0.5]];
        let mut opt = Adam::new(0.1, 0.0, &[(2, 2)]);

        for _ in 0..200 {
            let grad = &w * 2.0;
            opt.step(&mut [&mut w], &[grad]);
        }
        assert!(w.iter().all(|x| x.abs() < 1e-2));
    }

    #[test]
    fn test_weight_decay_shrinks_parameters() {
        let mut w = array![[5.0f32]];
        let mut opt = Adam::new(0.1, 0.5, &[(1, 1)]);
        for _ in 0..100 {
            // Zero task gradient; only decay acts
            opt.step(&mut [&mut w], &[array![[0.0f32]]]);
        }
        assert!(w[[0, 0]].abs() < 5.0);
    }
}
