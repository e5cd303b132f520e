//! Experiment matrix driver

mod runner;

pub use runner::{ExperimentRunner, TaskBuilder};
