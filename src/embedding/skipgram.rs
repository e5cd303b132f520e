//! Skip-gram with negative sampling over id sequences
//!
//! Trains two embedding tables; the target table is the output. Sequences
//! are random walks for graph embeddings and tokenized documents for text
//! embeddings. Negative samples come from a unigram^0.75 table and the
//! learning rate decays linearly over training.

use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Skip-gram configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkipGramConfig {
    /// Embedding dimension
    pub dim: usize,
    /// Context window size on each side
    pub window: usize,
    /// Negative samples per positive pair
    pub negative: usize,
    /// Initial learning rate
    pub lr: f32,
    /// Floor for the decayed learning rate
    pub min_lr: f32,
    /// Passes over the sequences
    pub epochs: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for SkipGramConfig {
    fn default() -> Self {
        SkipGramConfig {
            dim: 100,
            window: 5,
            negative: 5,
            lr: 0.025,
            min_lr: 1e-4,
            epochs: 2,
            seed: 42,
        }
    }
}

const NEG_TABLE_SIZE: usize = 1 << 20;

/// Skip-gram model with negative sampling
pub struct SkipGram {
    embeddings: Array2<f32>,
    context: Array2<f32>,
    neg_table: Vec<usize>,
    config: SkipGramConfig,
    current_lr: f32,
    processed: usize,
    total: usize,
}

impl SkipGram {
    /// Create a model over `vocab_size` ids with seeded small-uniform
    /// target embeddings and zero context embeddings.
    pub fn new(vocab_size: usize, config: SkipGramConfig) -> Self {
        let dim = config.dim;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let scale = 0.5 / dim as f32;
        let embeddings =
            Array2::from_shape_fn((vocab_size, dim), |_| rng.gen_range(-scale..scale));
        let context = Array2::zeros((vocab_size, dim));

        SkipGram {
            embeddings,
            context,
            neg_table: (0..vocab_size).collect(),
            current_lr: config.lr,
            config,
            processed: 0,
            total: 0,
        }
    }

    /// Build the negative sampling table from id frequencies (unigram^0.75).
    pub fn build_neg_table(&mut self, frequencies: &[usize]) {
        let total: f64 = frequencies.iter().map(|&f| (f as f64).powf(0.75)).sum();
        if total == 0.0 {
            return;
        }

        let mut table = Vec::with_capacity(NEG_TABLE_SIZE);
        let mut cumulative = 0.0;
        for (id, &freq) in frequencies.iter().enumerate() {
            cumulative += (freq as f64).powf(0.75) / total;
            let fill_to = (cumulative * NEG_TABLE_SIZE as f64) as usize;
            while table.len() < fill_to.min(NEG_TABLE_SIZE) {
                table.push(id);
            }
        }
        while table.len() < NEG_TABLE_SIZE {
            table.push(frequencies.len() - 1);
        }
        self.neg_table = table;
    }

    /// Train over the sequences for the configured number of epochs.
    pub fn train(&mut self, sequences: &[Vec<usize>]) {
        let tokens_per_epoch: usize = sequences.iter().map(Vec::len).sum();
        self.total = tokens_per_epoch * self.config.epochs;
        self.processed = 0;
        self.current_lr = self.config.lr;

        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(1));
        for _ in 0..self.config.epochs {
            for sequence in sequences {
                self.train_sequence(sequence, &mut rng);
            }
        }
    }

    fn train_sequence(&mut self, sequence: &[usize], rng: &mut StdRng) {
        let window = self.config.window;
        let negative = self.config.negative;

        for (pos, &target) in sequence.iter().enumerate() {
            // Dynamic window as in word2vec
            let actual = rng.gen_range(1..=window.max(1));
            let start = pos.saturating_sub(actual);
            let end = (pos + actual + 1).min(sequence.len());

            for ctx_pos in start..end {
                if ctx_pos == pos {
                    continue;
                }
                let context = sequence[ctx_pos];
                self.train_pair(target, context, 1.0);

                for _ in 0..negative {
                    let neg = self.neg_table[rng.gen_range(0..self.neg_table.len())];
                    if neg != context {
                        self.train_pair(target, neg, 0.0);
                    }
                }
            }

            self.processed += 1;
            self.update_lr();
        }
    }

    /// One SGD update on a (target, context) pair with the given label.
    fn train_pair(&mut self, target: usize, context: usize, label: f32) {
        let dot = self.embeddings.row(target).dot(&self.context.row(context));
        let sigmoid = 1.0 / (1.0 + (-dot).exp());
        let g = (label - sigmoid) * self.current_lr;

        let target_row = self.embeddings.row(target).to_owned();
        self.embeddings
            .row_mut(target)
            .scaled_add(g, &self.context.row(context));
        self.context.row_mut(context).scaled_add(g, &target_row);
    }

    fn update_lr(&mut self) {
        if self.total == 0 {
            return;
        }
        let progress = self.processed as f32 / self.total as f32;
        self.current_lr = (self.config.lr
            - (self.config.lr - self.config.min_lr) * progress)
            .max(self.config.min_lr);
    }

    /// The learned target embeddings, `(vocab_size, dim)`
    pub fn embeddings(&self) -> &Array2<f32> {
        &self.embeddings
    }

    /// Embedding dimension
    pub fn dim(&self) -> usize {
        self.config.dim
    }
}
