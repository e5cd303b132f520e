//! Seeded stratified splitting
//!
//! Splits keep per-class proportions: indices are grouped by label, each
//! group is shuffled with the seeded generator, and the test share is taken
//! per group. Nested application produces the train/val/test masks used by
//! GCN training; the masks are pairwise disjoint and cover every labeled
//! node.

use std::collections::BTreeMap;

use rand::prelude::*;

use crate::{CiteBenchError, Result};

/// One stratified split: `(ids, labels)` for both sides
pub type Split = ((Vec<usize>, Vec<usize>), (Vec<usize>, Vec<usize>));

/// Stratified shuffle split of `ids` into (rest, test) by `test_ratio`.
///
/// The test share of each class is `floor(class_size * test_ratio)`, capped
/// so that classes with at least two members keep one on the rest side.
pub fn stratified_split(
    ids: &[usize],
    labels: &[usize],
    test_ratio: f64,
    seed: u64,
) -> Result<Split> {
    if ids.len() != labels.len() {
        return Err(CiteBenchError::ModelError(format!(
            "stratified_split: {} ids but {} labels",
            ids.len(),
            labels.len()
        )));
    }
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(CiteBenchError::ModelError(format!(
            "test ratio {} outside [0, 1)",
            test_ratio
        )));
    }

    // Group by label in sorted label order for determinism
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (&id, &label) in ids.iter().zip(labels) {
        groups.entry(label).or_default().push(id);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut rest = (Vec::new(), Vec::new());
    let mut test = (Vec::new(), Vec::new());

    for (label, mut members) in groups {
        members.shuffle(&mut rng);
        let mut n_test = (members.len() as f64 * test_ratio).floor() as usize;
        if n_test == members.len() && n_test > 0 {
            n_test -= 1;
        }
        for (k, id) in members.into_iter().enumerate() {
            if k < n_test {
                test.0.push(id);
                test.1.push(label);
            } else {
                rest.0.push(id);
                rest.1.push(label);
            }
        }
    }
    Ok((rest, test))
}

/// Boolean train/val/test masks over all `n` nodes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Masks {
    /// Training nodes
    pub train: Vec<bool>,
    /// Validation nodes
    pub val: Vec<bool>,
    /// Test nodes
    pub test: Vec<bool>,
}

/// Nested stratified masks: first split off `test_ratio` of the labeled
/// nodes, then `val_ratio` of the remaining development nodes.
pub fn stratified_masks(
    n: usize,
    main_ids: &[usize],
    main_labels: &[usize],
    test_ratio: f64,
    val_ratio: f64,
    seed: u64,
) -> Result<Masks> {
    let ((dev_ids, dev_labels), (test_ids, _)) =
        stratified_split(main_ids, main_labels, test_ratio, seed)?;
    let ((train_ids, _), (val_ids, _)) =
        stratified_split(&dev_ids, &dev_labels, val_ratio, seed)?;

    let mut masks = Masks {
        train: vec![false; n],
        val: vec![false; n],
        test: vec![false; n],
    };
    for &i in &train_ids {
        masks.train[i] = true;
    }
    for &i in &val_ids {
        masks.val[i] = true;
    }
    for &i in &test_ids {
        masks.test[i] = true;
    }
    Ok(masks)
}
