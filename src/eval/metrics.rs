//! Classification metrics and summary statistics

use num_traits::Float;

/// Fraction of matching predictions
pub fn accuracy(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.is_empty() {
        return 0.0;
    }
    let hits = pred.iter().zip(truth).filter(|(p, t)| p == t).count();
    hits as f64 / pred.len() as f64
}

struct ClassCounts {
    tp: Vec<usize>,
    fp: Vec<usize>,
    fn_: Vec<usize>,
}

fn count_classes(pred: &[usize], truth: &[usize], n_classes: usize) -> ClassCounts {
    let mut counts = ClassCounts {
        tp: vec![0; n_classes],
        fp: vec![0; n_classes],
        fn_: vec![0; n_classes],
    };
    for (&p, &t) in pred.iter().zip(truth) {
        if p == t {
            counts.tp[p] += 1;
        } else {
            if p < n_classes {
                counts.fp[p] += 1;
            }
            counts.fn_[t] += 1;
        }
    }
    counts
}

/// Micro-averaged F1: counts pooled over classes. For single-label
/// multiclass prediction this equals accuracy.
pub fn f1_micro(pred: &[usize], truth: &[usize], n_classes: usize) -> f64 {
    let c = count_classes(pred, truth, n_classes);
    let tp: usize = c.tp.iter().sum();
    let fp: usize = c.fp.iter().sum();
    let fn_: usize = c.fn_.iter().sum();
    let denom = 2 * tp + fp + fn_;
    if denom == 0 {
        return 0.0;
    }
    2.0 * tp as f64 / denom as f64
}

/// Macro-averaged F1 over the classes present in the truth labels; absent
/// classes do not dilute the average.
pub fn f1_macro(pred: &[usize], truth: &[usize], n_classes: usize) -> f64 {
    let c = count_classes(pred, truth, n_classes);
    let mut sum = 0.0;
    let mut present = 0usize;
    for class in 0..n_classes {
        let support = c.tp[class] + c.fn_[class];
        if support == 0 {
            continue;
        }
        present += 1;
        let denom = 2 * c.tp[class] + c.fp[class] + c.fn_[class];
        if denom > 0 {
            sum += 2.0 * c.tp[class] as f64 / denom as f64;
        }
    }
    if present == 0 {
        0.0
    } else {
        sum / present as f64
    }
}

/// Arithmetic mean; zero for an empty slice
pub fn mean<F: Float>(xs: &[F]) -> F {
    if xs.is_empty() {
        return F::zero();
    }
    let sum = xs.iter().fold(F::zero(), |acc, &x| acc + x);
    sum / F::from(xs.len()).unwrap_or_else(F::one)
}

/// Population standard deviation; zero for an empty slice
pub fn std_dev<F: Float>(xs: &[F]) -> F {
    if xs.is_empty() {
        return F::zero();
    }
    let m = mean(xs);
    let var = xs
        .iter()
        .fold(F::zero(), |acc, &x| acc + (x - m) * (x - m))
        / F::from(xs.len()).unwrap_or_else(F::one);
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 1], &[0, 1, 0]), 2.0 / 3.0);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_micro_f1_equals_accuracy_for_multiclass() {
        let pred = vec![0, 1, 2, 1, 0];
        let truth = vec![0, 2, 2, 1, 1];
        let acc = accuracy(&pred, &truth);
        let f1 = f1_micro(&pred, &truth, 3);
        assert!((acc - f1).abs() < 1e-12);
    }

    #[test]
    fn test_macro_f1_perfect() {
        let pred = vec![0, 1, 2];
        let truth = vec![0, 1, 2];
        assert!((f1_macro(&pred, &truth, 3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_macro_f1_ignores_absent_classes() {
        // Class 2 never appears in truth
        let pred = vec![0, 1, 0, 1];
        let truth = vec![0, 1, 0, 1];
        assert!((f1_macro(&pred, &truth, 3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_macro_f1_known_value() {
        // Class 0: tp=1, fp=1, fn=0 -> f1 = 2/3
        // Class 1: tp=1, fp=0, fn=1 -> f1 = 2/3
        let pred = vec![0, 0, 1];
        let truth = vec![0, 1, 1];
        assert!((f1_macro(&pred, &truth, 2) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_std() {
        let xs = [2.0f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&xs) - 5.0).abs() < 1e-12);
        assert!((std_dev(&xs) - 2.0).abs() < 1e-12);
        assert_eq!(mean::<f64>(&[]), 0.0);
        assert_eq!(std_dev::<f64>(&[]), 0.0);
    }
}
