//! Truncated SVD via seeded orthogonal iteration
//!
//! The dimensionality-reduction workhorse behind HOPE and TADW. Orthogonal
//! iteration on `M Mᵀ` with modified Gram-Schmidt re-orthonormalization
//! converges to the leading left singular subspace; singular values and right
//! vectors follow from `Mᵀ U`.

use ndarray::{Array1, Array2};
use rand::prelude::*;

use crate::{CiteBenchError, Result};

/// Orthonormalize the columns of `q` in place (modified Gram-Schmidt).
/// Columns that collapse numerically are zeroed.
fn orthonormalize(q: &mut Array2<f32>) {
    let k = q.ncols();
    for j in 0..k {
        for i in 0..j {
            let proj = q.column(i).dot(&q.column(j));
            let col_i = q.column(i).to_owned();
            q.column_mut(j).scaled_add(-proj, &col_i);
        }
        let norm = q.column(j).dot(&q.column(j)).sqrt();
        if norm > 1e-12 {
            q.column_mut(j).mapv_inplace(|x| x / norm);
        } else {
            q.column_mut(j).fill(0.0);
        }
    }
}

/// Rank-`k` truncated SVD of `m`, returning `(u, sigma, v)` with
/// `u: (rows, k)`, `sigma: (k)`, `v: (cols, k)` and `m ≈ u diag(sigma) vᵀ`.
///
/// Deterministic for a given seed. `n_iter` around 30 suffices for the
/// well-separated spectra produced by proximity matrices.
pub fn truncated_svd(
    m: &Array2<f32>,
    k: usize,
    n_iter: usize,
    seed: u64,
) -> Result<(Array2<f32>, Array1<f32>, Array2<f32>)> {
    let (rows, cols) = m.dim();
    if k == 0 || k > rows.min(cols) {
        return Err(CiteBenchError::ModelError(format!(
            "truncated_svd: rank {} invalid for a {}x{} matrix",
            k, rows, cols
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut u = Array2::from_shape_fn((rows, k), |_| rng.gen_range(-1.0f32..1.0));
    orthonormalize(&mut u);

    for _ in 0..n_iter {
        // u <- orth(M (Mᵀ u))
        let z = m.t().dot(&u);
        u = m.dot(&z);
        orthonormalize(&mut u);
    }

    let b = m.t().dot(&u); // (cols, k)
    let mut sigma = Array1::zeros(k);
    let mut v = Array2::zeros((cols, k));
    for j in 0..k {
        let s = b.column(j).dot(&b.column(j)).sqrt();
        sigma[j] = s;
        if s > 1e-12 {
            let col = b.column(j).mapv(|x| x / s);
            v.column_mut(j).assign(&col);
        }
    }
    Ok((u, sigma, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruction(u: &Array2<f32>, sigma: &Array1<f32>, v: &Array2<f32>) -> Array2<f32> {
        let mut us = u.clone();
        for (j, mut col) in us.columns_mut().into_iter().enumerate() {
            col.mapv_inplace(|x| x * sigma[j]);
        }
        us.dot(&v.t())
    }

    #[test]
    fn test_exact_rank_recovery() {
        // Rank-2 matrix built from orthogonal outer products
        let a = ndarray::array![[2.0f32, 0.0], [0.0, 1.0], [0.0, 0.0], [0.0, 0.0]];
        let b = ndarray::array![[1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let m = a.dot(&b); // 4x3, singular values 2 and 1

        let (u, sigma, v) = truncated_svd(&m, 2, 50, 7).unwrap();
        assert!((sigma[0] - 2.0).abs() < 1e-3);
        assert!((sigma[1] - 1.0).abs() < 1e-3);

        let err = (&m - &reconstruction(&u, &sigma, &v))
            .iter()
            .map(|x| x.abs())
            .fold(0.0f32, f32::max);
        assert!(err < 1e-3);
    }

    #[test]
    fn test_orthonormal_factors() {
        let m = Array2::from_shape_fn((8, 6), |(i, j)| ((i * 7 + j * 3) % 5) as f32 - 2.0);
        let (u, _sigma, _v) = truncated_svd(&m, 3, 40, 1).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let d = u.column(i).dot(&u.column(j));
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((d - expected).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_invalid_rank() {
        let m = Array2::<f32>::zeros((3, 3));
        assert!(truncated_svd(&m, 0, 10, 0).is_err());
        assert!(truncated_svd(&m, 4, 10, 0).is_err());
    }

    #[test]
    fn test_deterministic() {
        let m = Array2::from_shape_fn((6, 6), |(i, j)| (i as f32 - j as f32).sin());
        let a = truncated_svd(&m, 2, 30, 3).unwrap();
        let b = truncated_svd(&m, 2, 30, 3).unwrap();
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }
}
